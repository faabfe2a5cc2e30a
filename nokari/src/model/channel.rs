use super::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use super::permissions::Permissions;
use super::user::User;

use serde::{Deserialize, Serialize};

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: User,
    pub content: String,
    /// The role ids of the author. Empty for messages sent outside of a guild.
    pub member_roles: Vec<RoleId>,
}

impl AsRef<ChannelId> for Message {
    fn as_ref(&self) -> &ChannelId {
        &self.channel_id
    }
}

impl AsRef<MessageId> for Message {
    fn as_ref(&self) -> &MessageId {
        &self.id
    }
}

/// The target of a [`PermissionOverwrite`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverwriteTarget {
    Role(RoleId),
    Member(UserId),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub allow: Permissions,
    pub deny: Permissions,
}

impl PermissionOverwrite {
    pub fn new(allow: Permissions, deny: Permissions) -> Self {
        Self { allow, deny }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildChannel {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub name: String,
    pub overwrites: HashMap<OverwriteTarget, PermissionOverwrite>,
}

impl GuildChannel {
    pub fn new(id: ChannelId, guild_id: GuildId) -> Self {
        Self {
            id,
            guild_id,
            name: String::new(),
            overwrites: HashMap::new(),
        }
    }

    /// Sets the overwrite for `target`. A channel holds at most one overwrite
    /// per target, so an existing one is replaced.
    pub fn set_overwrite(&mut self, target: OverwriteTarget, overwrite: PermissionOverwrite) {
        self.overwrites.insert(target, overwrite);
    }

    pub fn overwrite(&self, target: OverwriteTarget) -> Option<&PermissionOverwrite> {
        self.overwrites.get(&target)
    }
}
