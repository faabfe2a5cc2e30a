use nokari::builder::{CreateMessage, EditMessage};
use nokari::model::channel::{GuildChannel, Message};
use nokari::model::guild::{Guild, Member};
use nokari::model::id::{ChannelId, GuildId, MessageId, UserId};
use nokari::model::interaction::ComponentInteraction;
use nokari_core::gateway::{CacheStats, Gateway, GatewayError};

use async_trait::async_trait;
use serenity::builder::CreateInteractionResponse;
use serenity::client::Context;
use serenity::json::{self, Value};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id as sid;

/// A [`Gateway`] backed by the serenity http client and cache.
#[derive(Clone)]
pub struct SerenityGateway {
    ctx: Context,
}

impl SerenityGateway {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

/// Builds the body of an interaction response updating the message.
fn update_response(message: EditMessage) -> Value {
    let mut response = CreateInteractionResponse::default();
    response
        .kind(InteractionResponseType::UpdateMessage)
        .interaction_response_data(|d| {
            message.fill_interaction_response(d);
            d
        });

    Value::from(json::hashmap_to_json_map(response.0))
}

#[async_trait]
impl Gateway for SerenityGateway {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: CreateMessage,
    ) -> Result<Message, GatewayError> {
        let msg = sid::ChannelId(channel_id.0)
            .send_message(&self.ctx, |m| {
                message.fill_builder(m);
                m
            })
            .await
            .map_err(GatewayError::new)?;

        Ok(msg.into())
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: EditMessage,
    ) -> Result<(), GatewayError> {
        sid::ChannelId(channel_id.0)
            .edit_message(&self.ctx, sid::MessageId(message_id.0), |m| {
                message.fill_builder(m);
                m
            })
            .await
            .map_err(GatewayError::new)?;

        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), GatewayError> {
        sid::ChannelId(channel_id.0)
            .delete_message(&self.ctx, sid::MessageId(message_id.0))
            .await
            .map_err(GatewayError::new)
    }

    async fn update_interaction(
        &self,
        interaction: &ComponentInteraction,
        message: EditMessage,
    ) -> Result<(), GatewayError> {
        self.ctx
            .http
            .create_interaction_response(
                interaction.id.0,
                &interaction.token,
                &update_response(message),
            )
            .await
            .map_err(GatewayError::new)
    }

    fn guild(&self, guild_id: GuildId) -> Option<Guild> {
        self.ctx
            .cache
            .guild(sid::GuildId(guild_id.0))
            .map(Guild::from)
    }

    fn channel(&self, channel_id: ChannelId) -> Option<GuildChannel> {
        self.ctx
            .cache
            .guild_channel(sid::ChannelId(channel_id.0))
            .map(GuildChannel::from)
    }

    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member> {
        self.ctx
            .cache
            .member(sid::GuildId(guild_id.0), sid::UserId(user_id.0))
            .map(Member::from)
    }

    fn current_user_id(&self) -> Option<UserId> {
        match self.ctx.cache.current_user_id() {
            // Not ready yet.
            id if id.0 == 0 => None,
            id => Some(id.into()),
        }
    }

    fn cache_stats(&self) -> CacheStats {
        let cache = &self.ctx.cache;

        CacheStats {
            guilds: cache.guild_count() + cache.unavailable_guilds().len(),
            channels: cache.guild_channel_count(),
            users: cache.user_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::update_response;

    use nokari::builder::{Button, ButtonStyle, EditMessage};

    use serde_json::json;

    #[test]
    fn test_update_response() {
        let edit = EditMessage::new(|m| {
            m.buttons(vec![
                Button::new("sure", "Sure", ButtonStyle::Success).disabled(true),
                Button::new("nvm", "Never mind", ButtonStyle::Danger).disabled(true),
            ]);
        });

        let response = update_response(edit);
        assert_eq!(response["type"], json!(7));

        let row = &response["data"]["components"][0];
        assert_eq!(row["type"], json!(1));
        assert_eq!(row["components"][0]["custom_id"], json!("sure"));
        assert_eq!(row["components"][0]["disabled"], json!(true));
        assert_eq!(row["components"][1]["label"], json!("Never mind"));
        assert_eq!(row["components"][1]["style"], json!(4));

        let edit = EditMessage::new(|m| {
            m.content("done");
            m.buttons(vec![]);
        });

        let response = update_response(edit);
        assert_eq!(response["data"]["content"], json!("done"));
        assert_eq!(response["data"]["components"], json!([]));
    }
}
