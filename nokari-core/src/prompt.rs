//! Yes/no confirmation prompts answered with buttons.
use crate::gateway::{Gateway, GatewayError};
use crate::hook::{EventData, EventKind, HookController};

use nokari::builder::{Button, ButtonStyle, CreateMessage, EditMessage};
use nokari::model::id::{ChannelId, MessageId, UserId};
use nokari::model::interaction::ComponentInteraction;
use nokari::util::color::Color;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time;

use std::time::Duration;

pub const CONFIRM_ID: &str = "sure";
pub const CANCEL_ID: &str = "nvm";

const CONFIRM_LABEL: &str = "Sure";
const CANCEL_LABEL: &str = "Never mind";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PromptOptions {
    /// Time to wait for an answer before declining.
    pub timeout: Duration,
    /// Delete the prompt once answered instead of disabling its buttons.
    pub delete_after: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            delete_after: false,
        }
    }
}

fn buttons(disabled: bool) -> Vec<Button> {
    vec![
        Button::new(CONFIRM_ID, CONFIRM_LABEL, ButtonStyle::Success).disabled(disabled),
        Button::new(CANCEL_ID, CANCEL_LABEL, ButtonStyle::Danger).disabled(disabled),
    ]
}

/// Asks `author_id` to confirm `message` in `channel_id`.
///
/// Returns `true` only if the author pressed the confirm button before the
/// timeout. Presses by other users are ignored. The prompt is cleaned up on
/// every exit path once it was sent.
pub async fn prompt<T>(
    gateway: &dyn Gateway,
    hooks: &HookController,
    channel_id: ChannelId,
    author_id: UserId,
    message: T,
    options: PromptOptions,
) -> Result<bool, GatewayError>
where
    T: ToString,
{
    // Subscribe before sending so no early press is missed.
    let mut rx = hooks.get_receiver(EventKind::ComponentInteraction);

    let description = message.to_string();
    let msg = gateway
        .send_message(
            channel_id,
            CreateMessage::new(|m| {
                m.embed(|e| {
                    e.description(description);
                    e.color(Color::ACCENT);
                });

                for button in buttons(false) {
                    m.button(button);
                }
            }),
        )
        .await?;

    let answer = time::timeout(options.timeout, wait_for_answer(&mut rx, msg.id, author_id))
        .await
        .ok()
        .flatten();

    let (confirm, interaction) = match answer {
        Some((confirm, interaction)) => (confirm, Some(interaction)),
        None => (false, None),
    };

    cleanup(gateway, channel_id, msg.id, interaction.as_ref(), options).await;

    Ok(confirm)
}

async fn wait_for_answer(
    rx: &mut broadcast::Receiver<EventData>,
    message_id: MessageId,
    author_id: UserId,
) -> Option<(bool, ComponentInteraction)> {
    loop {
        let event = match rx.recv().await {
            Ok(EventData::ComponentInteraction(event)) => event,
            Err(RecvError::Lagged(skipped)) => {
                log::debug!("[CORE] Prompt receiver skipped {} events", skipped);
                continue;
            }
            Err(RecvError::Closed) => return None,
        };

        if event.message_id != message_id || event.user_id != author_id {
            continue;
        }

        match event.custom_id.as_str() {
            CONFIRM_ID => return Some((true, event)),
            CANCEL_ID => return Some((false, event)),
            _ => (),
        }
    }
}

async fn cleanup(
    gateway: &dyn Gateway,
    channel_id: ChannelId,
    message_id: MessageId,
    interaction: Option<&ComponentInteraction>,
    options: PromptOptions,
) {
    let res = if options.delete_after {
        gateway.delete_message(channel_id, message_id).await
    } else {
        let edit = EditMessage::new(|m| {
            m.buttons(buttons(true));
        });

        match interaction {
            Some(interaction) => gateway.update_interaction(interaction, edit).await,
            None => gateway.edit_message(channel_id, message_id, edit).await,
        }
    };

    if let Err(err) = res {
        log::warn!("[CORE] Failed to clean up prompt {}: {}", message_id, err);
    }
}

#[cfg(test)]
mod tests {
    use super::{prompt, PromptOptions, CANCEL_ID, CONFIRM_ID};
    use crate::hook::HookController;
    use crate::testing::{Call, TestGateway};

    use nokari::model::id::{ChannelId, UserId};

    use std::time::Duration;

    const AUTHOR: UserId = UserId(3);
    const CHANNEL: ChannelId = ChannelId(5);

    async fn run(
        gateway: &TestGateway,
        hooks: &HookController,
        presses: Vec<(UserId, &'static str)>,
        options: PromptOptions,
    ) -> bool {
        let answer = async {
            let msg = gateway.wait_sent().await;
            for (user_id, custom_id) in presses {
                hooks.dispatch_event(gateway.press(&msg, user_id, custom_id));
            }
        };

        let (res, ()) = tokio::join!(
            prompt(gateway, hooks, CHANNEL, AUTHOR, "Are you sure?", options),
            answer
        );

        res.unwrap()
    }

    fn options() -> PromptOptions {
        PromptOptions {
            timeout: Duration::from_millis(200),
            delete_after: false,
        }
    }

    #[tokio::test]
    async fn test_prompt_confirm() {
        let gateway = TestGateway::new();
        let hooks = HookController::new();

        assert!(run(&gateway, &hooks, vec![(AUTHOR, CONFIRM_ID)], options()).await);

        let calls = gateway.calls();
        assert!(matches!(calls[0], Call::Send(..)));
        match &calls[1] {
            Call::UpdateInteraction(_, edit) => {
                let buttons = edit.buttons.as_ref().unwrap();
                assert_eq!(buttons.len(), 2);
                assert!(buttons.iter().all(|b| b.disabled));
            }
            call => panic!("unexpected call {:?}", call),
        }
    }

    #[tokio::test]
    async fn test_prompt_decline() {
        let gateway = TestGateway::new();
        let hooks = HookController::new();

        assert!(!run(&gateway, &hooks, vec![(AUTHOR, CANCEL_ID)], options()).await);
        assert!(matches!(gateway.calls()[1], Call::UpdateInteraction(..)));
    }

    #[tokio::test]
    async fn test_prompt_ignores_other_users() {
        let gateway = TestGateway::new();
        let hooks = HookController::new();

        let presses = vec![
            (UserId(99), CONFIRM_ID),
            (AUTHOR, "something"),
            (AUTHOR, CONFIRM_ID),
        ];
        assert!(run(&gateway, &hooks, presses, options()).await);

        // Only the author is considered, so the timeout is reached.
        let presses = vec![(UserId(99), CONFIRM_ID)];
        assert!(!run(&gateway, &hooks, presses, options()).await);
    }

    #[tokio::test]
    async fn test_prompt_timeout() {
        let gateway = TestGateway::new();
        let hooks = HookController::new();

        assert!(!run(&gateway, &hooks, vec![], options()).await);

        // Without an interaction the message is edited instead.
        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], Call::Edit(..)));
    }

    #[tokio::test]
    async fn test_prompt_delete_after() {
        let gateway = TestGateway::new();
        let hooks = HookController::new();

        let options = PromptOptions {
            delete_after: true,
            ..options()
        };

        assert!(run(&gateway, &hooks, vec![(AUTHOR, CONFIRM_ID)], options).await);
        assert!(matches!(gateway.calls()[1], Call::Delete(..)));

        assert!(!run(&gateway, &hooks, vec![], options).await);
        assert!(matches!(gateway.calls()[3], Call::Delete(..)));
    }
}
