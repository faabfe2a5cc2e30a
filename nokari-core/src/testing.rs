//! An in-memory [`Gateway`] for tests.
use crate::config::Config;
use crate::context::MessageContext;
use crate::gateway::{CacheStats, Gateway, GatewayError};
use crate::state::State;
use crate::store::mem::MemStore;

use nokari::builder::{CreateMessage, EditMessage};
use nokari::model::channel::{GuildChannel, Message, OverwriteTarget, PermissionOverwrite};
use nokari::model::guild::{Guild, Member, Role};
use nokari::model::id::{ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId};
use nokari::model::interaction::ComponentInteraction;
use nokari::model::permissions::Permissions;
use nokari::model::user::User;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum Call {
    Send(ChannelId, CreateMessage),
    Edit(ChannelId, MessageId, EditMessage),
    Delete(ChannelId, MessageId),
    UpdateInteraction(ComponentInteraction, EditMessage),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Mutex<Vec<Call>>,
    guilds: Mutex<HashMap<GuildId, Guild>>,
    channels: Mutex<HashMap<ChannelId, GuildChannel>>,
    members: Mutex<HashMap<(GuildId, UserId), Member>>,
    last_sent: Mutex<Option<Message>>,
    sent: Notify,
    next_id: AtomicU64,
}

#[derive(Clone, Debug, Default)]
pub struct TestGateway {
    inner: Arc<Inner>,
}

impl TestGateway {
    pub const OWNER: UserId = UserId(1);
    pub const BOT: UserId = UserId(2);
    pub const GUILD: GuildId = GuildId(10);
    pub const CHANNEL: ChannelId = ChannelId(5);
    pub const BOT_ROLE: RoleId = RoleId(20);

    pub fn new() -> Self {
        let gateway = Self::default();
        gateway.inner.next_id.store(1000, Ordering::SeqCst);
        gateway
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Caches [`Self::GUILD`] with [`Self::CHANNEL`] and the bot member.
    pub fn add_guild(&self) {
        let mut guild = Guild::new(Self::GUILD, Self::OWNER);
        guild.insert_role(Role::new(
            Self::GUILD.everyone_role(),
            Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::EMBED_LINKS
                | Permissions::READ_MESSAGE_HISTORY,
        ));
        guild.insert_role(Role::new(Self::BOT_ROLE, Permissions::MANAGE_MESSAGES));

        self.inner.guilds.lock().insert(Self::GUILD, guild);
        self.inner
            .channels
            .lock()
            .insert(Self::CHANNEL, GuildChannel::new(Self::CHANNEL, Self::GUILD));
        self.inner.members.lock().insert(
            (Self::GUILD, Self::BOT),
            Member::new(Self::BOT, Self::GUILD, vec![Self::BOT_ROLE]),
        );
    }

    pub fn set_overwrite(&self, target: OverwriteTarget, overwrite: PermissionOverwrite) {
        if let Some(channel) = self.inner.channels.lock().get_mut(&Self::CHANNEL) {
            channel.set_overwrite(target, overwrite);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().clone()
    }

    /// Returns all messages sent so far.
    pub fn sent(&self) -> Vec<CreateMessage> {
        self.inner
            .calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Send(_, msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Waits for the next message to be sent.
    pub async fn wait_sent(&self) -> Message {
        self.inner.sent.notified().await;
        self.inner.last_sent.lock().clone().unwrap()
    }

    /// Creates a button press on `msg`.
    pub fn press(&self, msg: &Message, user_id: UserId, custom_id: &str) -> ComponentInteraction {
        ComponentInteraction {
            id: InteractionId(self.next_id()),
            token: String::from("token"),
            channel_id: msg.channel_id,
            guild_id: msg.guild_id,
            message_id: msg.id,
            user_id,
            custom_id: custom_id.to_owned(),
        }
    }

    pub fn context(&self, msg: Message) -> MessageContext {
        MessageContext::new(Arc::new(self.clone()), state(), msg)
    }
}

#[async_trait]
impl Gateway for TestGateway {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        builder: CreateMessage,
    ) -> Result<Message, GatewayError> {
        let mut msg = message(Self::BOT, None, builder.content.as_deref().unwrap_or(""));
        msg.id = MessageId(self.next_id());
        msg.channel_id = channel_id;
        msg.author.bot = true;

        self.inner.calls.lock().push(Call::Send(channel_id, builder));
        *self.inner.last_sent.lock() = Some(msg.clone());
        self.inner.sent.notify_one();

        Ok(msg)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: EditMessage,
    ) -> Result<(), GatewayError> {
        self.inner
            .calls
            .lock()
            .push(Call::Edit(channel_id, message_id, message));
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), GatewayError> {
        self.inner
            .calls
            .lock()
            .push(Call::Delete(channel_id, message_id));
        Ok(())
    }

    async fn update_interaction(
        &self,
        interaction: &ComponentInteraction,
        message: EditMessage,
    ) -> Result<(), GatewayError> {
        self.inner
            .calls
            .lock()
            .push(Call::UpdateInteraction(interaction.clone(), message));
        Ok(())
    }

    fn guild(&self, guild_id: GuildId) -> Option<Guild> {
        self.inner.guilds.lock().get(&guild_id).cloned()
    }

    fn channel(&self, channel_id: ChannelId) -> Option<GuildChannel> {
        self.inner.channels.lock().get(&channel_id).cloned()
    }

    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member> {
        self.inner.members.lock().get(&(guild_id, user_id)).cloned()
    }

    fn current_user_id(&self) -> Option<UserId> {
        Some(Self::BOT)
    }

    fn cache_stats(&self) -> CacheStats {
        CacheStats {
            guilds: self.inner.guilds.lock().len(),
            channels: self.inner.channels.lock().len(),
            users: self.inner.members.lock().len(),
        }
    }
}

/// Creates a new state with [`TestGateway::OWNER`] as owner.
pub fn state() -> Arc<State> {
    let mut config = Config::default();
    config.owners.push(TestGateway::OWNER);

    Arc::new(State::new(config, Arc::new(MemStore::new()), Vec::new()))
}

/// Creates a message in [`TestGateway::CHANNEL`].
pub fn message(author: UserId, guild_id: Option<GuildId>, content: &str) -> Message {
    Message {
        id: MessageId(100),
        channel_id: TestGateway::CHANNEL,
        guild_id,
        author: User {
            id: author,
            bot: false,
            discriminator: 1,
            name: String::from("user"),
        },
        content: content.to_owned(),
        member_roles: Vec::new(),
    }
}
