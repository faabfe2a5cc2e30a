use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid format")]
    InvalidFormat,
    #[error(transparent)]
    ParseIntError(#[from] ParseIntError),
}

macro_rules! snowflake {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Copy,
                Clone,
                Debug,
                Default,
                PartialEq,
                Eq,
                PartialOrd,
                Ord,
                Hash,
                Serialize,
                Deserialize,
            )]
            pub struct $name(pub u64);

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

snowflake!(
    ChannelId,
    GuildId,
    MessageId,
    /// The id of a guild role. The `@everyone` role of a guild shares its id
    /// with the guild.
    RoleId,
    UserId,
    InteractionId,
);

impl GuildId {
    /// Returns the id of the `@everyone` role of this guild.
    pub fn everyone_role(self) -> RoleId {
        RoleId(self.0)
    }
}

/// Strips `start` and `end` from a mention, returning the inner snowflake.
fn strip_mention<'a>(s: &'a str, start: &str) -> Result<&'a str, ParseError> {
    s.strip_prefix(start)
        .and_then(|s| s.strip_suffix('>'))
        .ok_or(ParseError::InvalidFormat)
}

impl FromStr for ChannelId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = strip_mention(s, "<#")?.parse()?;
        Ok(Self(id))
    }
}

impl FromStr for RoleId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = strip_mention(s, "<@&")?.parse()?;
        Ok(Self(id))
    }
}

impl FromStr for UserId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = strip_mention(s, "<@")?;
        let s = s.strip_prefix('!').unwrap_or(s);

        let id = s.parse()?;
        Ok(Self(id))
    }
}

impl UserId {
    /// Returns both mention forms of the user, `<@id>` and `<@!id>`.
    pub fn mentions(self) -> [String; 2] {
        [format!("<@{}>", self.0), format!("<@!{}>", self.0)]
    }
}

impl From<serenity::model::id::ChannelId> for ChannelId {
    fn from(src: serenity::model::id::ChannelId) -> Self {
        Self(src.0)
    }
}

impl From<serenity::model::id::GuildId> for GuildId {
    fn from(src: serenity::model::id::GuildId) -> Self {
        Self(src.0)
    }
}

impl From<serenity::model::id::MessageId> for MessageId {
    fn from(src: serenity::model::id::MessageId) -> Self {
        Self(src.0)
    }
}

impl From<serenity::model::id::RoleId> for RoleId {
    fn from(src: serenity::model::id::RoleId) -> Self {
        Self(src.0)
    }
}

impl From<serenity::model::id::UserId> for UserId {
    fn from(src: serenity::model::id::UserId) -> Self {
        Self(src.0)
    }
}

impl From<serenity::model::id::InteractionId> for InteractionId {
    fn from(src: serenity::model::id::InteractionId) -> Self {
        Self(src.0)
    }
}
