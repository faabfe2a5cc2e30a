use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// The accent color used in embeds sent by the bot.
    pub const ACCENT: Self = Self(0x28_c3_d4);
    pub const ERROR: Self = Self(0xe7_4c_3c);
}

impl From<u32> for Color {
    fn from(c: u32) -> Self {
        Self(c)
    }
}

impl From<serenity::utils::Colour> for Color {
    fn from(c: serenity::utils::Colour) -> Self {
        Self(c.0)
    }
}
