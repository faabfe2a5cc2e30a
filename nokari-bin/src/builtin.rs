use crate::command;

use nokari::bot::{Error::InvalidCommandUsage, Result};
use nokari::builder::CreateMessage;
use nokari::util::color::Color;
use nokari_core::check::Check;
use nokari_core::command::{Command, Error as CommandError};
use nokari_core::context::MessageContext;
use nokari_core::help;
use nokari_core::module::{parse_targets, Operation};
use nokari_core::state::State;

use std::time::Duration;

/// Loads all builtin commands into the [`State`]. If the state is new or has
/// no commands loaded, `init` will never fail.
pub fn init(state: &State) -> std::result::Result<(), CommandError> {
    const COMMANDS: &[fn() -> Command] = &[help, uptime];
    const OWNER_COMMANDS: &[fn() -> Command] = &[load, unload, reload, enable, disable];

    for f in COMMANDS {
        state.commands().load_command(f(), None, None)?;
    }

    for f in OWNER_COMMANDS {
        let mut cmd = f();
        cmd.check(Check::OwnerOnly);
        cmd.set_hidden(true);

        state.commands().load_command(cmd, None, None)?;
    }

    Ok(())
}

command!(
    help,
    description: "Show the global help message or a help message for a command.",
    usage: "[Path to Command]",
    example: "prefix user",
    executor: _help,
);
/// Shows a list of all commands if no arguments are given or the arguments
/// don't point to a command.
async fn _help(ctx: MessageContext) -> Result {
    let commands = ctx.state.commands();

    let description = match commands.get_by_path(&ctx.args.join(" ")) {
        Some(command) if !ctx.args.is_empty() => help::command(&command, &ctx.prefix),
        _ => help::global(&commands.list_commands(), &ctx.prefix),
    };

    ctx.respond(CreateMessage::new(|m| {
        m.embed(|e| {
            e.color(Color::ACCENT);
            e.title("Help");
            e.description(description);
        });
    }))
    .await?;

    Ok(())
}

command!(
    uptime,
    description: "Show the bot uptime.",
    executor: _uptime,
);
async fn _uptime(ctx: MessageContext) -> Result {
    let description = format_duration(ctx.state.uptime());

    ctx.respond(CreateMessage::new(|m| {
        m.embed(|e| {
            e.color(Color::ACCENT);
            e.title("Uptime");
            e.description(description);
        });
    }))
    .await?;

    Ok(())
}

pub(crate) fn format_duration(duration: Duration) -> String {
    match duration.as_secs() {
        secs if secs >= 86400 => format!(
            "{} days, {} hrs, {} min",
            secs / 86400,
            (secs % 86400) / 3600,
            (secs % 3600) / 60
        ),
        secs if secs >= 3600 => format!(
            "{} hrs, {} min, {} sec",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ),
        secs if secs >= 60 => format!("{} min, {} sec", secs / 60, secs % 60),
        secs => format!("{} sec", secs),
    }
}

command!(
    load,
    description: "Loads certain or all the plugins.",
    usage: "[plugins|*]",
    example: "meta, config",
    executor: _load,
);
async fn _load(ctx: MessageContext) -> Result {
    execute_plugins(&ctx, Operation::Load).await
}

command!(
    unload,
    description: "Unloads certain or all the plugins.",
    usage: "[plugins|*]",
    example: "meta",
    executor: _unload,
);
async fn _unload(ctx: MessageContext) -> Result {
    execute_plugins(&ctx, Operation::Unload).await
}

command!(
    reload,
    description: "Reloads certain or all the plugins.",
    usage: "[plugins|*]",
    example: "*",
    executor: _reload,
);
async fn _reload(ctx: MessageContext) -> Result {
    execute_plugins(&ctx, Operation::Reload).await
}

async fn execute_plugins(ctx: &MessageContext, op: Operation) -> Result {
    let input = match ctx.raw_args.trim() {
        "" => "*",
        input => input,
    };

    let plugins = ctx.state.plugins();
    let targets = parse_targets(input, &plugins.names());

    let report = plugins.execute(op, &targets);
    ctx.respond(report.to_string()).await?;

    Ok(())
}

command!(
    enable,
    description: "Enables a disabled command.",
    usage: "<Path to Command>",
    example: "prefix user",
    executor: _enable,
);
async fn _enable(ctx: MessageContext) -> Result {
    toggle_command(&ctx, false).await
}

command!(
    disable,
    description: "Disables a command until it is enabled again.",
    usage: "<Path to Command>",
    example: "ping",
    executor: _disable,
);
async fn _disable(ctx: MessageContext) -> Result {
    toggle_command(&ctx, true).await
}

async fn toggle_command(ctx: &MessageContext, disabled: bool) -> Result {
    if ctx.args.is_empty() {
        return Err(InvalidCommandUsage);
    }

    let path = ctx.args.join(" ");

    let content = match ctx.state.commands().get_by_path(&path) {
        Some(command) if command.qualified_name() == "enable" => {
            String::from("The `enable` command cannot be disabled.")
        }
        Some(command) => {
            let name = command.qualified_name();

            match (command.set_disabled(disabled), disabled) {
                (true, true) => format!("`{}` is already disabled.", name),
                (false, false) => format!("`{}` is already enabled.", name),
                (_, true) => format!("Disabled `{}`.", name),
                (_, false) => format!("Enabled `{}`.", name),
            }
        }
        None => format!("No command named `{}`.", path),
    };

    ctx.respond(content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_duration, init};

    use nokari_core::check::Check;
    use nokari_core::config::Config;
    use nokari_core::state::State;
    use nokari_core::store::mem::MemStore;

    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(59)), "59 sec");
        assert_eq!(format_duration(Duration::from_secs(61)), "1 min, 1 sec");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1 hrs, 2 min, 3 sec");
        assert_eq!(
            format_duration(Duration::from_secs(90000)),
            "1 days, 1 hrs, 0 min"
        );
    }

    #[tokio::test]
    async fn test_init() {
        let state = State::new(Config::default(), Arc::new(MemStore::new()), Vec::new());
        init(&state).unwrap();

        let help = state.commands().get_by_path("help").unwrap();
        assert!(help.checks.is_empty());

        for name in ["load", "unload", "reload", "enable", "disable"] {
            let command = state.commands().get_by_path(name).unwrap();
            assert!(command.hidden);
            assert!(matches!(command.checks.as_slice(), [Check::OwnerOnly]));
        }

        // Loading twice fails.
        assert!(init(&state).is_err());
    }
}
