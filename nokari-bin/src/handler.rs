use crate::gateway::SerenityGateway;

use nokari_core::dispatch::{dispatch, dispatch_delete, dispatch_edit, dispatch_interaction};
use nokari_core::state::State;

use async_trait::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, GuildId, MessageId};

use std::sync::Arc;

pub struct Handler {
    state: Arc<State>,
}

impl Handler {
    pub fn new(state: Arc<State>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, message: Message) {
        let gateway = Arc::new(SerenityGateway::new(ctx));
        let outcome = dispatch(gateway, self.state.clone(), message.into()).await;

        log::trace!("[BOT] Dispatched message: {:?}", outcome);
    }

    async fn message_update(
        &self,
        ctx: Context,
        old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        // Only cached messages are complete.
        let new = match new {
            Some(new) if event.content.is_some() => new,
            _ => return,
        };

        if let Some(old) = old_if_available {
            if old.content == new.content {
                return;
            }
        }

        let gateway = Arc::new(SerenityGateway::new(ctx));
        let outcome = dispatch_edit(gateway, self.state.clone(), new.into()).await;

        log::trace!("[BOT] Dispatched edited message: {:?}", outcome);
    }

    async fn message_delete(
        &self,
        ctx: Context,
        _channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        let gateway = SerenityGateway::new(ctx);
        dispatch_delete(&gateway, &self.state, deleted_message_id.into()).await;
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        if let Interaction::MessageComponent(interaction) = interaction {
            dispatch_interaction(&self.state, interaction.into());
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!(
            "[BOT] Bot online as {}#{:04}",
            ready.user.name,
            ready.user.discriminator
        );
    }
}
