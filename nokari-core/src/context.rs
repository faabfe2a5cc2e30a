use crate::command::LoadedCommand;
use crate::gateway::{Gateway, GatewayError};
use crate::prompt::{self, PromptOptions};
use crate::state::State;

use nokari::builder::CreateMessage;
use nokari::model::channel::Message;
use nokari::model::guild::Guild;
use nokari::model::id::{ChannelId, MessageId};

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// An alias for `Context<Message>`. This context is received by
/// command handlers.
pub type MessageContext = Context<Message>;

#[derive(Clone)]
pub struct Context<T> {
    pub gateway: Arc<dyn Gateway>,
    pub state: Arc<State>,
    /// The prefix the command was invoked with, including trailing whitespace.
    pub prefix: String,
    /// The invoked command. `None` for events not related to a command.
    pub command: Option<Arc<LoadedCommand>>,
    /// The arguments split on whitespace, respecting quotes.
    pub args: Vec<String>,
    /// Everything after the command name, unchanged.
    pub raw_args: String,
    pub event: T,
}

impl<T> Context<T> {
    pub fn new(gateway: Arc<dyn Gateway>, state: Arc<State>, event: T) -> Self {
        Self {
            gateway,
            state,
            prefix: String::new(),
            command: None,
            args: Vec::new(),
            raw_args: String::new(),
            event,
        }
    }
}

impl MessageContext {
    /// Sends a message to the channel of the event.
    pub async fn respond<M>(&self, message: M) -> Result<Message, GatewayError>
    where
        M: Into<CreateMessage>,
    {
        self.send(message.into()).await
    }

    /// Sends a message to the channel of the event, referencing the event
    /// message.
    pub async fn reply<M>(&self, message: M) -> Result<Message, GatewayError>
    where
        M: Into<CreateMessage>,
    {
        let mut message = message.into();
        message.reference_message(self.event.channel_id, self.event.id);

        self.send(message).await
    }

    /// Sends `message` and remembers it as the latest response to the event.
    async fn send(&self, message: CreateMessage) -> Result<Message, GatewayError> {
        let msg = self
            .gateway
            .send_message(self.event.channel_id, message)
            .await?;

        self.state
            .responses()
            .insert(self.event.id, msg.channel_id, msg.id);
        Ok(msg)
    }

    /// Asks the author of the event to confirm `message`.
    pub async fn prompt<M>(&self, message: M, delete_after: bool) -> Result<bool, GatewayError>
    where
        M: ToString,
    {
        let options = PromptOptions {
            timeout: self.state.config.prompt_timeout(),
            delete_after,
        };

        prompt::prompt(
            self.gateway.as_ref(),
            self.state.hooks(),
            self.event.channel_id,
            self.event.author.id,
            message,
            options,
        )
        .await
    }

    pub fn is_owner(&self) -> bool {
        self.state.is_owner(self.event.author.id)
    }

    /// Returns the guild of the event from the cache.
    pub fn guild(&self) -> Option<Guild> {
        self.event.guild_id.and_then(|id| self.gateway.guild(id))
    }
}

impl<T> AsRef<ChannelId> for Context<T>
where
    T: AsRef<ChannelId>,
{
    fn as_ref(&self) -> &ChannelId {
        self.event.as_ref()
    }
}

impl<T> AsRef<MessageId> for Context<T>
where
    T: AsRef<MessageId>,
{
    fn as_ref(&self) -> &MessageId {
        self.event.as_ref()
    }
}

impl<T> Debug for Context<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("prefix", &self.prefix)
            .field("command", &self.command)
            .field("args", &self.args)
            .field("raw_args", &self.raw_args)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
