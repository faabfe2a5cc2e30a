use super::channel::{self, OverwriteTarget};

use serenity::model::channel::{GuildChannel, Message, PermissionOverwrite, PermissionOverwriteType};

impl From<Message> for channel::Message {
    fn from(src: Message) -> Self {
        Self {
            id: src.id.into(),
            channel_id: src.channel_id.into(),
            guild_id: src.guild_id.map(|v| v.into()),
            author: src.author.into(),
            content: src.content,
            member_roles: src
                .member
                .map(|m| m.roles.into_iter().map(|v| v.into()).collect())
                .unwrap_or_default(),
        }
    }
}

fn convert_overwrite(
    src: PermissionOverwrite,
) -> Option<(OverwriteTarget, channel::PermissionOverwrite)> {
    #[allow(unreachable_patterns)]
    let target = match src.kind {
        PermissionOverwriteType::Member(id) => OverwriteTarget::Member(id.into()),
        PermissionOverwriteType::Role(id) => OverwriteTarget::Role(id.into()),
        _ => return None,
    };

    Some((
        target,
        channel::PermissionOverwrite::new(src.allow.into(), src.deny.into()),
    ))
}

impl From<GuildChannel> for channel::GuildChannel {
    fn from(src: GuildChannel) -> Self {
        Self {
            id: src.id.into(),
            guild_id: src.guild_id.into(),
            name: src.name,
            overwrites: src
                .permission_overwrites
                .into_iter()
                .filter_map(convert_overwrite)
                .collect(),
        }
    }
}
