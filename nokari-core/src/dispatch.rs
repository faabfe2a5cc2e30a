//! Turns incoming messages into command invocations.
use crate::check::{run_checks, CheckError};
use crate::context::MessageContext;
use crate::gateway::Gateway;
use crate::help;
use crate::prefix::{candidates, resolve_prefix};
use crate::router::parse_args;
use crate::state::State;

use nokari::bot::Error;
use nokari::builder::CreateMessage;
use nokari::model::channel::Message;
use nokari::model::id::MessageId;
use nokari::model::interaction::ComponentInteraction;
use nokari::util::color::Color;

use std::sync::Arc;

const FAILURE_MESSAGE: &str = "An error occurred while running this command.";

/// The exit taken by [`dispatch`] and [`dispatch_edit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message is not a command invocation.
    Ignored,
    CheckFailed(CheckError),
    Executed,
    /// The command handler returned an error.
    Failed,
}

/// Returns the prefixes valid for `msg`.
fn prefixes(gateway: &dyn Gateway, state: &State, msg: &Message) -> Vec<String> {
    let mentions = gateway
        .current_user_id()
        .map(|id| id.mentions().to_vec())
        .unwrap_or_default();

    let guild = msg.guild_id.and_then(|id| state.prefixes(id.0));
    let user = state.prefixes(msg.author.id.0);

    candidates(
        &mentions,
        guild.as_deref(),
        &state.config.default_prefixes,
        user.as_deref(),
    )
}

/// Handles a new message.
pub async fn dispatch(gateway: Arc<dyn Gateway>, state: Arc<State>, msg: Message) -> DispatchOutcome {
    run(gateway, state, msg, false).await
}

/// Handles an edited message. If it still invokes a command, the response to
/// the previous invocation is deleted and the command runs again.
pub async fn dispatch_edit(
    gateway: Arc<dyn Gateway>,
    state: Arc<State>,
    msg: Message,
) -> DispatchOutcome {
    run(gateway, state, msg, true).await
}

/// Handles a deleted message by deleting the latest response to it. Returns
/// `true` if a response was deleted.
pub async fn dispatch_delete(gateway: &dyn Gateway, state: &State, message_id: MessageId) -> bool {
    let (channel_id, response_id) = match state.responses().remove(message_id) {
        Some(response) => response,
        None => return false,
    };

    match gateway.delete_message(channel_id, response_id).await {
        Ok(()) => true,
        Err(err) => {
            log::warn!(
                "[CORE] Failed to delete response {} in channel {}: {}",
                response_id,
                channel_id,
                err
            );
            false
        }
    }
}

async fn run(
    gateway: Arc<dyn Gateway>,
    state: Arc<State>,
    msg: Message,
    edited: bool,
) -> DispatchOutcome {
    if msg.author.bot {
        return DispatchOutcome::Ignored;
    }

    let (prefix, command, raw_args) = {
        let candidates = prefixes(gateway.as_ref(), &state, &msg);

        let prefix = match resolve_prefix(&candidates, &msg.content) {
            Some(prefix) => prefix,
            None => return DispatchOutcome::Ignored,
        };

        match state.commands().get_command(&msg.content[prefix.len()..]) {
            Some((command, raw_args)) => (prefix.to_owned(), command, raw_args.to_owned()),
            None => return DispatchOutcome::Ignored,
        }
    };

    if edited {
        dispatch_delete(gateway.as_ref(), &state, msg.id).await;
    }

    let name = command.qualified_name();
    log::debug!("[CORE] {} invoked command {}", msg.author.id, name);

    let mut ctx = MessageContext::new(gateway, state, msg);
    ctx.prefix = prefix;
    ctx.args = parse_args(&raw_args).into_iter().map(String::from).collect();
    ctx.raw_args = raw_args;
    ctx.command = Some(command.clone());

    if let Err(err) = run_checks(&command, &ctx) {
        match &err {
            CheckError::Unexpected(reason) => {
                log::warn!("[CORE] Failed to run checks of {}: {}", name, reason)
            }
            err => log::debug!("[CORE] Check of {} failed: {}", name, err),
        }

        let footer = err.footer();
        let message = CreateMessage::new(|m| {
            m.embed(|e| {
                e.description(&err);
                e.color(Color::ERROR);

                if let Some(footer) = footer {
                    e.footer(footer);
                }
            });
        });

        reply(&ctx, message).await;
        return DispatchOutcome::CheckFailed(err);
    }

    let executor = match &command.executor {
        Some(executor) => executor.clone(),
        // Groups without a handler show their help.
        None => {
            reply(&ctx, help_message(&ctx)).await;
            return DispatchOutcome::Executed;
        }
    };

    match executor.send(ctx.clone()).await {
        Ok(()) => DispatchOutcome::Executed,
        Err(Error::InvalidCommandUsage) => {
            reply(&ctx, help_message(&ctx)).await;
            DispatchOutcome::Failed
        }
        Err(err) => {
            log::error!("[CORE] Command {} returned an error: {}", name, err);

            let message = CreateMessage::new(|m| {
                m.embed(|e| {
                    e.description(FAILURE_MESSAGE);
                    e.color(Color::ERROR);
                });
            });

            reply(&ctx, message).await;
            DispatchOutcome::Failed
        }
    }
}

/// Handles a new component interaction.
pub fn dispatch_interaction(state: &State, interaction: ComponentInteraction) {
    state.hooks().dispatch_event(interaction);
}

fn help_message(ctx: &MessageContext) -> CreateMessage {
    let description = match &ctx.command {
        Some(command) => help::command(command, &ctx.prefix),
        None => help::global(&ctx.state.commands().list_commands(), &ctx.prefix),
    };

    CreateMessage::new(|m| {
        m.embed(|e| {
            e.description(description);
            e.color(Color::ACCENT);
        });
    })
}

async fn reply(ctx: &MessageContext, message: CreateMessage) {
    if let Err(err) = ctx.reply(message).await {
        log::warn!(
            "[CORE] Failed to reply in channel {}: {}",
            ctx.event.channel_id,
            err
        );
    }
}
