//! The interface between the command framework and the chat client.
use nokari::builder::{CreateMessage, EditMessage};
use nokari::model::channel::{GuildChannel, Message};
use nokari::model::guild::{Guild, Member};
use nokari::model::id::{ChannelId, GuildId, MessageId, UserId};
use nokari::model::interaction::ComponentInteraction;

use async_trait::async_trait;

use std::error;
use std::fmt::{self, Display, Formatter};

/// An error returned by the underlying client.
#[derive(Debug)]
pub struct GatewayError(Box<dyn error::Error + Send + Sync + 'static>);

impl GatewayError {
    pub fn new<E>(err: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }

    /// Creates a new error from a message.
    pub fn msg<T>(msg: T) -> Self
    where
        T: ToString,
    {
        Self(msg.to_string().into())
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.0.source()
    }
}

/// Number of entities in the cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub guilds: usize,
    pub channels: usize,
    pub users: usize,
}

/// REST calls and cache lookups used while handling events.
///
/// Cache lookups never hit the network and return `None` if the entity is not
/// cached.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: CreateMessage,
    ) -> Result<Message, GatewayError>;

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: EditMessage,
    ) -> Result<(), GatewayError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), GatewayError>;

    /// Responds to a component interaction by updating the message the
    /// component is attached to.
    async fn update_interaction(
        &self,
        interaction: &ComponentInteraction,
        message: EditMessage,
    ) -> Result<(), GatewayError>;

    fn guild(&self, guild_id: GuildId) -> Option<Guild>;

    fn channel(&self, channel_id: ChannelId) -> Option<GuildChannel>;

    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member>;

    /// Returns the id of the bot user, `None` before the client is ready.
    fn current_user_id(&self) -> Option<UserId>;

    fn cache_stats(&self) -> CacheStats;
}
