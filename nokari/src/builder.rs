use crate::model::id::{ChannelId, MessageId};
use crate::util::color::Color;

use serde::{Deserialize, Serialize};
use std::convert::{From, Into};

/// [`CreateMessage`] is used to construct a new
/// message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessage {
    pub content: Option<String>,
    pub reference_message: Option<(ChannelId, MessageId)>,
    pub embed: Option<CreateEmbed>,
    pub buttons: Vec<Button>,
}

impl CreateMessage {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut builder = Self::default();
        f(&mut builder);
        builder
    }

    /// Set the content of the message.
    pub fn content<T>(&mut self, content: T) -> &mut Self
    where
        T: ToString,
    {
        self.content = Some(content.to_string());
        self
    }

    pub fn reference_message(&mut self, channel_id: ChannelId, message_id: MessageId) -> &mut Self {
        self.reference_message = Some((channel_id, message_id));
        self
    }

    pub fn embed<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut CreateEmbed),
    {
        self.embed = Some(CreateEmbed::new(f));
        self
    }

    /// Adds a button. All buttons are placed in a single action row.
    pub fn button(&mut self, button: Button) -> &mut Self {
        self.buttons.push(button);
        self
    }

    pub fn fill_builder(self, builder: &mut serenity::builder::CreateMessage<'_>) {
        if let Some(content) = self.content {
            builder.content(content);
        }

        if let Some((channel_id, message_id)) = self.reference_message {
            builder.reference_message((
                serenity::model::id::ChannelId(channel_id.0),
                serenity::model::id::MessageId(message_id.0),
            ));
        }

        if let Some(embed) = self.embed {
            builder.embed(|e| {
                embed.fill_builder(e);
                e
            });
        }

        if !self.buttons.is_empty() {
            builder.components(|c| fill_components(self.buttons, c));
        }
    }
}

impl<T> From<T> for CreateMessage
where
    T: AsRef<str>,
{
    fn from(t: T) -> Self {
        let mut builder = Self::default();
        builder.content(t.as_ref());
        builder
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmbed {
    pub color: Option<Color>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub footer: Option<String>,
    pub fields: Vec<(String, String, bool)>,
}

impl CreateEmbed {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut builder = Self::default();
        f(&mut builder);
        builder
    }

    pub fn description<T>(&mut self, description: T) -> &mut Self
    where
        T: ToString,
    {
        self.description = Some(description.to_string());
        self
    }

    pub fn title<T>(&mut self, title: T) -> &mut Self
    where
        T: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    pub fn color<T>(&mut self, color: T) -> &mut Self
    where
        T: Into<Color>,
    {
        self.color = Some(color.into());
        self
    }

    pub fn footer<T>(&mut self, text: T) -> &mut Self
    where
        T: ToString,
    {
        self.footer = Some(text.to_string());
        self
    }

    pub fn field<T, U>(&mut self, name: T, value: U, inline: bool) -> &mut Self
    where
        T: ToString,
        U: ToString,
    {
        self.fields
            .push((name.to_string(), value.to_string(), inline));
        self
    }

    pub fn fill_builder(self, builder: &mut serenity::builder::CreateEmbed) {
        if let Some(description) = self.description {
            builder.description(description);
        }

        if let Some(title) = self.title {
            builder.title(title);
        }

        if let Some(color) = self.color {
            builder.color(color.0);
        }

        if let Some(footer) = self.footer {
            builder.footer(|f| f.text(footer));
        }

        for (name, value, inline) in self.fields {
            builder.field(name, value, inline);
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

impl From<ButtonStyle> for serenity::model::application::component::ButtonStyle {
    fn from(style: ButtonStyle) -> Self {
        match style {
            ButtonStyle::Primary => Self::Primary,
            ButtonStyle::Secondary => Self::Secondary,
            ButtonStyle::Success => Self::Success,
            ButtonStyle::Danger => Self::Danger,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

impl Button {
    pub fn new<T, U>(custom_id: T, label: U, style: ButtonStyle) -> Self
    where
        T: ToString,
        U: ToString,
    {
        Self {
            custom_id: custom_id.to_string(),
            label: label.to_string(),
            style,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

fn fill_components(
    buttons: Vec<Button>,
    builder: &mut serenity::builder::CreateComponents,
) -> &mut serenity::builder::CreateComponents {
    builder.create_action_row(|row| {
        for button in buttons {
            row.create_button(|b| {
                b.custom_id(button.custom_id)
                    .label(button.label)
                    .style(button.style.into())
                    .disabled(button.disabled)
            });
        }
        row
    })
}

/// [`EditMessage`] is used to edit an existing message. Fields left as `None`
/// are not changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMessage {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
    pub buttons: Option<Vec<Button>>,
}

impl EditMessage {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut builder = Self::default();
        f(&mut builder);
        builder
    }

    pub fn content<T>(&mut self, content: T) -> &mut Self
    where
        T: ToString,
    {
        self.content = Some(content.to_string());
        self
    }

    pub fn embed<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut CreateEmbed),
    {
        self.embed = Some(CreateEmbed::new(f));
        self
    }

    /// Replaces all buttons of the message.
    pub fn buttons(&mut self, buttons: Vec<Button>) -> &mut Self {
        self.buttons = Some(buttons);
        self
    }

    pub fn fill_builder(self, builder: &mut serenity::builder::EditMessage<'_>) {
        if let Some(content) = self.content {
            builder.content(content);
        }

        if let Some(embed) = self.embed {
            builder.embed(|e| {
                embed.fill_builder(e);
                e
            });
        }

        if let Some(buttons) = self.buttons {
            if buttons.is_empty() {
                builder.components(|c| c);
            } else {
                builder.components(|c| fill_components(buttons, c));
            }
        }
    }

    /// Fills the data of an interaction response updating the message the
    /// component is attached to.
    pub fn fill_interaction_response(
        self,
        builder: &mut serenity::builder::CreateInteractionResponseData<'_>,
    ) {
        if let Some(content) = self.content {
            builder.content(content);
        }

        if let Some(embed) = self.embed {
            builder.embed(|e| {
                embed.fill_builder(e);
                e
            });
        }

        if let Some(buttons) = self.buttons {
            if buttons.is_empty() {
                builder.components(|c| c);
            } else {
                builder.components(|c| fill_components(buttons, c));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Button, ButtonStyle, CreateMessage};

    #[test]
    fn test_create_message_from_str() {
        let msg = CreateMessage::from("pong");
        assert_eq!(msg.content.as_deref(), Some("pong"));
        assert!(msg.embed.is_none());
    }

    #[test]
    fn test_create_message_buttons() {
        let msg = CreateMessage::new(|m| {
            m.content("sure?");
            m.button(Button::new("sure", "Sure", ButtonStyle::Success));
            m.button(Button::new("nvm", "Never mind", ButtonStyle::Danger).disabled(true));
        });

        assert_eq!(msg.buttons.len(), 2);
        assert!(!msg.buttons[0].disabled);
        assert!(msg.buttons[1].disabled);
        assert_eq!(msg.buttons[1].style, ButtonStyle::Danger);
    }
}
