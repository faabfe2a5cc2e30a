use super::id::{GuildId, RoleId, UserId};
use super::permissions::Permissions;

use serde::{Deserialize, Serialize};

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: Permissions,
    pub position: i64,
}

impl Role {
    pub fn new(id: RoleId, permissions: Permissions) -> Self {
        Self {
            id,
            name: String::new(),
            permissions,
            position: 0,
        }
    }
}

/// A guild member. Only the fields relevant for command handling are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
}

impl Member {
    pub fn new(user_id: UserId, guild_id: GuildId, roles: Vec<RoleId>) -> Self {
        Self {
            user_id,
            guild_id,
            nick: None,
            roles,
        }
    }
}

/// A snapshot of a guild as seen by the cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub owner_id: UserId,
    /// All roles of the guild, including the `@everyone` role which is keyed by
    /// the guild id.
    pub roles: HashMap<RoleId, Role>,
}

impl Guild {
    pub fn new(id: GuildId, owner_id: UserId) -> Self {
        Self {
            id,
            name: String::new(),
            owner_id,
            roles: HashMap::new(),
        }
    }

    /// Inserts a role, replacing any existing role with the same id.
    pub fn insert_role(&mut self, role: Role) {
        self.roles.insert(role.id, role);
    }

    /// Returns the `@everyone` role of the guild.
    pub fn everyone_role(&self) -> Option<&Role> {
        self.roles.get(&self.id.everyone_role())
    }
}
