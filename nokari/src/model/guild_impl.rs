use super::guild::{Guild, Member, Role};

impl From<serenity::model::guild::Role> for Role {
    fn from(src: serenity::model::guild::Role) -> Self {
        Self {
            id: src.id.into(),
            name: src.name,
            permissions: src.permissions.into(),
            position: src.position,
        }
    }
}

impl From<serenity::model::guild::Member> for Member {
    fn from(src: serenity::model::guild::Member) -> Self {
        Self {
            user_id: src.user.id.into(),
            guild_id: src.guild_id.into(),
            nick: src.nick,
            roles: src.roles.into_iter().map(|r| r.into()).collect(),
        }
    }
}

impl From<serenity::model::guild::Guild> for Guild {
    fn from(src: serenity::model::guild::Guild) -> Self {
        Self {
            id: src.id.into(),
            name: src.name,
            owner_id: src.owner_id.into(),
            roles: src
                .roles
                .into_iter()
                .map(|(id, role)| (id.into(), role.into()))
                .collect(),
        }
    }
}
