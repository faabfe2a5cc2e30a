use crate::builtin::format_duration;
use crate::command;

use nokari::bot::Result;
use nokari::builder::{CreateMessage, EditMessage};
use nokari::util::color::Color;
use nokari_core::context::MessageContext;
use nokari_core::gateway::CacheStats;

use std::time::{Duration, Instant};

command!(
    ping,
    aliases: ["pong", "latency"],
    description: "Shows the round trip latency to Discord.",
    executor: _ping,
);
async fn _ping(ctx: MessageContext) -> Result {
    let start = Instant::now();
    let msg = ctx.respond("Pong?").await?;
    let latency = start.elapsed();

    let content = format!("Pong? {} {}ms", indicator(latency), latency.as_millis());
    ctx.gateway
        .edit_message(
            msg.channel_id,
            msg.id,
            EditMessage::new(|m| {
                m.content(content);
            }),
        )
        .await?;

    Ok(())
}

fn indicator(latency: Duration) -> &'static str {
    match latency.as_millis() {
        ms if ms > 500 => "🔴",
        ms if ms > 100 => "🟡",
        _ => "🟢",
    }
}

command!(
    stats,
    description: "Shows the uptime of the bot and the size of its cache.",
    executor: _stats,
);
async fn _stats(ctx: MessageContext) -> Result {
    let message = stats_message(ctx.state.uptime(), ctx.gateway.cache_stats());
    ctx.respond(message).await?;

    Ok(())
}

fn stats_message(uptime: Duration, stats: CacheStats) -> CreateMessage {
    CreateMessage::new(|m| {
        m.embed(|e| {
            e.color(Color::ACCENT);
            e.title("Stats");
            e.field("Uptime", format_duration(uptime), true);
            e.field("Total servers", stats.guilds, true);
            e.field("Channels", stats.channels, true);
            e.field("Total cached users", stats.users, true);
        });
    })
}
