use crate::command;

use nokari::bot::{Error::InvalidCommandUsage, Result};
use nokari::builder::CreateMessage;
use nokari::model::id::UserId;
use nokari::util::color::Color;
use nokari_core::context::MessageContext;

use std::fmt::{self, Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
enum PrefixError {
    Empty,
    /// The prefix is a mention of the bot, which always works.
    Mention(String),
}

impl Display for PrefixError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty prefix"),
            Self::Mention(prefix) => write!(f, "{} is an existing prefix...", prefix),
        }
    }
}

fn validate_prefix(prefix: &str, bot_id: Option<UserId>) -> std::result::Result<&str, PrefixError> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(PrefixError::Empty);
    }

    if let Some(id) = bot_id {
        if id.mentions().iter().any(|m| m == prefix) {
            return Err(PrefixError::Mention(prefix.to_owned()));
        }
    }

    Ok(prefix)
}

fn format_prefixes(prefixes: &[String]) -> String {
    prefixes
        .iter()
        .map(|p| format!("`{}`", p))
        .collect::<Vec<_>>()
        .join(", ")
}

command!(
    prefix,
    description: "Shows the prefixes of this guild and your own prefixes.",
    executor: _prefix,
);
async fn _prefix(ctx: MessageContext) -> Result {
    show(&ctx).await
}

/// Responds with the prefixes of the guild and the author.
async fn show(ctx: &MessageContext) -> Result {
    let guild_id = match ctx.event.guild_id {
        Some(id) => id,
        None => return Err(InvalidCommandUsage),
    };

    let guild_prefixes = ctx
        .state
        .prefixes(guild_id.0)
        .unwrap_or_else(|| ctx.state.config.default_prefixes.clone());

    let guild_name = match ctx.guild() {
        Some(guild) => guild.name,
        None => String::from("Guild"),
    };

    let mut description = format!("**{}**: {}", guild_name, format_prefixes(&guild_prefixes));

    if let Some(prefixes) = ctx.state.prefixes(ctx.event.author.id.0) {
        description.push_str(&format!(
            "\n**{}**: {}",
            ctx.event.author.tag(),
            format_prefixes(&prefixes)
        ));
    }

    ctx.respond(CreateMessage::new(|m| {
        m.embed(|e| {
            e.color(Color::ACCENT);
            e.title("Prefixes");
            e.description(description);
        });
    }))
    .await?;

    Ok(())
}

command!(
    user,
    description: "Adds the prefix to your own prefixes, or removes it if it exists.",
    usage: "<Prefix>",
    example: "?",
    executor: _user,
);
async fn _user(ctx: MessageContext) -> Result {
    toggle(&ctx, ctx.event.author.id.0).await
}

command!(
    guild,
    description: "Adds the prefix to the guild prefixes, or removes it if it exists.",
    usage: "<Prefix>",
    example: "!",
    executor: _guild,
);
async fn _guild(ctx: MessageContext) -> Result {
    match ctx.event.guild_id {
        Some(id) => toggle(&ctx, id.0).await,
        None => Err(InvalidCommandUsage),
    }
}

async fn toggle(ctx: &MessageContext, hash: u64) -> Result {
    let prefix = match validate_prefix(&ctx.raw_args, ctx.gateway.current_user_id()) {
        Ok(prefix) => prefix,
        Err(PrefixError::Empty) => return Err(InvalidCommandUsage),
        Err(err) => {
            ctx.reply(err.to_string()).await?;
            return Ok(());
        }
    };

    ctx.state.toggle_prefix(hash, prefix).await?;
    show(ctx).await
}

command!(
    clear,
    description: "Removes all of your own prefixes.",
    executor: _clear,
);
async fn _clear(ctx: MessageContext) -> Result {
    let hash = ctx.event.author.id.0;

    let prefixes = match ctx.state.prefixes(hash) {
        Some(prefixes) if !prefixes.is_empty() => prefixes,
        _ => {
            ctx.reply("You don't have any prefixes.").await?;
            return Ok(());
        }
    };

    let message = match prefixes.len() {
        1 => String::from("You're about to remove 1 prefix."),
        n => format!("You're about to remove {} prefixes.", n),
    };

    if !ctx.prompt(message, true).await? {
        ctx.respond("Aborted!").await?;
        return Ok(());
    }

    for prefix in &prefixes {
        ctx.state.toggle_prefix(hash, prefix).await?;
    }

    ctx.respond(format!("Removed {}.", format_prefixes(&prefixes)))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_prefixes, validate_prefix, PrefixError};

    use nokari::model::id::UserId;

    #[test]
    fn test_validate_prefix() {
        let bot = Some(UserId(42));

        assert_eq!(validate_prefix("  ?  ", bot), Ok("?"));
        assert_eq!(validate_prefix("   ", bot), Err(PrefixError::Empty));
        assert_eq!(
            validate_prefix("<@42>", bot),
            Err(PrefixError::Mention(String::from("<@42>")))
        );
        assert_eq!(
            validate_prefix("<@!42>", bot),
            Err(PrefixError::Mention(String::from("<@!42>")))
        );
        assert_eq!(validate_prefix("<@43>", bot), Ok("<@43>"));
        assert_eq!(validate_prefix("<@42>", None), Ok("<@42>"));
    }

    #[test]
    fn test_format_prefixes() {
        assert_eq!(format_prefixes(&[]), "");
        assert_eq!(
            format_prefixes(&[String::from("n!"), String::from("nokari")]),
            "`n!`, `nokari`"
        );
    }
}
