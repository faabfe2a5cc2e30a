use crate::command::LoadedCommand;

use std::fmt::Write;
use std::sync::Arc;

/// Returns the help message listing all visible `commands`.
pub fn global(commands: &[Arc<LoadedCommand>], prefix: &str) -> String {
    let mut string = String::new();

    let _ = writeln!(string, "__**Commands:**__");

    for command in commands.iter().filter(|c| !c.hidden) {
        if command.description.is_empty() {
            let _ = writeln!(string, "- {}", command.name);
        } else {
            let _ = writeln!(string, "- {}: {}", command.name, command.description);
        }
    }

    let _ = writeln!(
        string,
        "\n**Use `{}help` *`command`* to get more details about a command.**",
        prefix
    );

    string
}

/// Returns the help message of a single command.
///
/// `prefix` is used to build the "Usage" and "Example" lines.
pub fn command(command: &LoadedCommand, prefix: &str) -> String {
    let path = command.qualified_name();
    let mut string = String::new();

    let _ = writeln!(string, "**Name**: {}", path);

    if !command.description.is_empty() {
        let _ = writeln!(string, "**Description**: {}", command.description);
    }

    if !command.aliases.is_empty() {
        let _ = writeln!(string, "**Aliases**: `{}`", command.aliases.join("`, `"));
    }

    if command.executor.is_some() {
        let _ = writeln!(string, "**Usage**: `{}{} {}`", prefix, path, command.usage);

        if !command.example.is_empty() {
            let _ = writeln!(
                string,
                "**Example**: `{}{} {}`",
                prefix, path, command.example
            );
        }
    }

    let sub_commands = command.list_sub_commands();
    if !sub_commands.is_empty() {
        let _ = writeln!(string, "**Sub-Commands**:");

        for command in sub_commands.iter().filter(|c| !c.hidden) {
            let _ = writeln!(string, "- {}", command.name);
        }
    }

    string
}
