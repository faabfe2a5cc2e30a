use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// The permission bits defined by the Discord API.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE = 1 << 0;
        const KICK_MEMBERS = 1 << 1;
        const BAN_MEMBERS = 1 << 2;
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_CHANNELS = 1 << 4;
        const MANAGE_GUILD = 1 << 5;
        const ADD_REACTIONS = 1 << 6;
        const VIEW_AUDIT_LOG = 1 << 7;
        const PRIORITY_SPEAKER = 1 << 8;
        const STREAM = 1 << 9;
        const VIEW_CHANNEL = 1 << 10;
        const SEND_MESSAGES = 1 << 11;
        const SEND_TTS_MESSAGES = 1 << 12;
        const MANAGE_MESSAGES = 1 << 13;
        const EMBED_LINKS = 1 << 14;
        const ATTACH_FILES = 1 << 15;
        const READ_MESSAGE_HISTORY = 1 << 16;
        const MENTION_EVERYONE = 1 << 17;
        const USE_EXTERNAL_EMOJIS = 1 << 18;
        const VIEW_GUILD_INSIGHTS = 1 << 19;
        const CONNECT = 1 << 20;
        const SPEAK = 1 << 21;
        const MUTE_MEMBERS = 1 << 22;
        const DEAFEN_MEMBERS = 1 << 23;
        const MOVE_MEMBERS = 1 << 24;
        const USE_VAD = 1 << 25;
        const CHANGE_NICKNAME = 1 << 26;
        const MANAGE_NICKNAMES = 1 << 27;
        const MANAGE_ROLES = 1 << 28;
        const MANAGE_WEBHOOKS = 1 << 29;
        const MANAGE_EMOJIS_AND_STICKERS = 1 << 30;
        const USE_APPLICATION_COMMANDS = 1 << 31;
        const REQUEST_TO_SPEAK = 1 << 32;
        const MANAGE_EVENTS = 1 << 33;
        const MANAGE_THREADS = 1 << 34;
        const CREATE_PUBLIC_THREADS = 1 << 35;
        const CREATE_PRIVATE_THREADS = 1 << 36;
        const USE_EXTERNAL_STICKERS = 1 << 37;
        const SEND_MESSAGES_IN_THREADS = 1 << 38;
        const USE_EMBEDDED_ACTIVITIES = 1 << 39;
        const MODERATE_MEMBERS = 1 << 40;
    }
}

impl Permissions {
    /// Alternative name of `MENTION_EVERYONE` used by some client libraries.
    pub const MENTION_ROLES: Self = Self::MENTION_EVERYONE;

    /// Permissions that are meaningless without `SEND_MESSAGES`.
    pub const SEND_DEPENDENT: Self = Self::SEND_TTS_MESSAGES
        .union(Self::MENTION_EVERYONE)
        .union(Self::EMBED_LINKS)
        .union(Self::ATTACH_FILES);

    /// Text and voice permissions that are meaningless without `VIEW_CHANNEL`.
    pub const CHANNEL_DEPENDENT: Self = Self::CREATE_INSTANT_INVITE
        .union(Self::MANAGE_CHANNELS)
        .union(Self::ADD_REACTIONS)
        .union(Self::PRIORITY_SPEAKER)
        .union(Self::STREAM)
        .union(Self::VIEW_CHANNEL)
        .union(Self::SEND_MESSAGES)
        .union(Self::SEND_TTS_MESSAGES)
        .union(Self::MANAGE_MESSAGES)
        .union(Self::EMBED_LINKS)
        .union(Self::ATTACH_FILES)
        .union(Self::READ_MESSAGE_HISTORY)
        .union(Self::MENTION_EVERYONE)
        .union(Self::USE_EXTERNAL_EMOJIS)
        .union(Self::CONNECT)
        .union(Self::SPEAK)
        .union(Self::MUTE_MEMBERS)
        .union(Self::DEAFEN_MEMBERS)
        .union(Self::MOVE_MEMBERS)
        .union(Self::USE_VAD)
        .union(Self::MANAGE_ROLES)
        .union(Self::MANAGE_WEBHOOKS)
        .union(Self::USE_APPLICATION_COMMANDS);

    /// Applies a single allow/deny layer: denied bits are removed first, then
    /// allowed bits are added.
    pub fn apply_overwrite(self, allow: Self, deny: Self) -> Self {
        (self & !deny) | allow
    }

    /// Returns the lowercase, space separated names of all set flags, e.g.
    /// `"send messages, embed links"`.
    pub fn names(&self) -> String {
        self.iter_names()
            .map(|(name, _)| name.replace('_', " ").to_lowercase())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<serenity::model::permissions::Permissions> for Permissions {
    fn from(src: serenity::model::permissions::Permissions) -> Self {
        Self::from_bits_truncate(src.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::Permissions;

    #[test]
    fn test_channel_dependent_mask() {
        assert_eq!(
            Permissions::CHANNEL_DEPENDENT.bits(),
            0b1011_0011_1111_0111_1111_1111_0101_0001
        );
    }

    #[test]
    fn test_apply_overwrite() {
        let base = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;

        let perms = base.apply_overwrite(Permissions::EMBED_LINKS, Permissions::SEND_MESSAGES);
        assert_eq!(perms, Permissions::VIEW_CHANNEL | Permissions::EMBED_LINKS);

        // Allow wins over deny inside the same layer.
        let perms = base.apply_overwrite(Permissions::SEND_MESSAGES, Permissions::SEND_MESSAGES);
        assert_eq!(perms, base);
    }

    #[test]
    fn test_names() {
        let perms = Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS;
        assert_eq!(perms.names(), "send messages, embed links");
    }
}
