use nokari::model::interaction::ComponentInteraction;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use std::collections::HashMap;

const QUEUE_SIZE: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    ComponentInteraction,
}

#[derive(Clone, Debug)]
pub enum EventData {
    ComponentInteraction(ComponentInteraction),
}

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ComponentInteraction(_) => EventKind::ComponentInteraction,
        }
    }
}

impl From<ComponentInteraction> for EventData {
    fn from(src: ComponentInteraction) -> Self {
        Self::ComponentInteraction(src)
    }
}

/// Fans out gateway events to everyone waiting for them, e.g. a pending
/// prompt waiting for a button press.
#[derive(Debug, Default)]
pub struct HookController {
    channels: RwLock<HashMap<EventKind, broadcast::Sender<EventData>>>,
}

impl HookController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new receiver for all events of `kind`. Only events dispatched
    /// after this call are received.
    pub fn get_receiver(&self, kind: EventKind) -> broadcast::Receiver<EventData> {
        let mut channels = self.channels.write();

        match channels.get(&kind) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = broadcast::channel(QUEUE_SIZE);
                channels.insert(kind, tx);
                rx
            }
        }
    }

    /// Dispatches an event to all receivers of its kind. Events without any
    /// receivers are dropped.
    pub fn dispatch_event<T>(&self, event: T)
    where
        T: Into<EventData>,
    {
        let event = event.into();
        let channels = self.channels.read();

        if let Some(tx) = channels.get(&event.kind()) {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventData, EventKind, HookController};

    use nokari::model::id::{ChannelId, InteractionId, MessageId, UserId};
    use nokari::model::interaction::ComponentInteraction;

    fn interaction() -> ComponentInteraction {
        ComponentInteraction {
            id: InteractionId(1),
            token: String::from("token"),
            channel_id: ChannelId(2),
            guild_id: None,
            message_id: MessageId(3),
            user_id: UserId(4),
            custom_id: String::from("sure"),
        }
    }

    #[tokio::test]
    async fn test_hook_controller() {
        let hooks = HookController::new();

        // No receivers yet, the event is dropped.
        hooks.dispatch_event(interaction());

        let mut rx = hooks.get_receiver(EventKind::ComponentInteraction);
        hooks.dispatch_event(interaction());

        let EventData::ComponentInteraction(event) = rx.recv().await.unwrap();
        assert_eq!(event, interaction());

        assert!(rx.try_recv().is_err());
    }
}
