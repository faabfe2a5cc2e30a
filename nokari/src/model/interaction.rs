use super::id::{ChannelId, GuildId, InteractionId, MessageId, UserId};

use serde::{Deserialize, Serialize};

use serenity::model::application::interaction::message_component::MessageComponentInteraction;

/// A button press (or other component interaction) on a message sent by the
/// bot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInteraction {
    pub id: InteractionId,
    /// Token used to respond to the interaction.
    pub token: String,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub custom_id: String,
}

impl From<MessageComponentInteraction> for ComponentInteraction {
    fn from(src: MessageComponentInteraction) -> Self {
        Self {
            id: src.id.into(),
            token: src.token,
            channel_id: src.channel_id.into(),
            guild_id: src.guild_id.map(|v| v.into()),
            message_id: src.message.id.into(),
            user_id: src.user.id.into(),
            custom_id: src.data.custom_id,
        }
    }
}
