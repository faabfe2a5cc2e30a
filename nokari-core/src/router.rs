use crate::command::{CommandMap, LoadedCommand};

use std::sync::Arc;

/// Splits `input` into arguments. Arguments are separated by whitespace,
/// text wrapped in double quotes is a single argument.
pub fn parse_args(input: &str) -> Vec<&str> {
    let mut args = Vec::new();

    let mut start = 0;
    let mut esc = false;
    for (i, b) in input.bytes().enumerate() {
        match b {
            b if b.is_ascii_whitespace() && !esc => {
                args.push(&input[start..i]);
                start = i + 1;
            }
            b'"' => {
                if esc {
                    args.push(&input[start + 1..i]);
                    start = i + 1;
                } else {
                    args.push(&input[start..i]);
                    start = i;
                }
                esc = !esc;
            }
            _ => (),
        }
    }

    // An unclosed quote keeps the quote char.
    args.push(&input[start..]);

    args.into_iter().filter(|arg| !arg.is_empty()).collect()
}

/// Splits off the first whitespace delimited token. The remainder keeps its
/// leading whitespace.
fn split_token(input: &str) -> (&str, &str) {
    match input.find(char::is_whitespace) {
        Some(i) => (&input[..i], &input[i..]),
        None => (input, ""),
    }
}

/// Returns the command registered under `name`.
pub fn lookup<'a>(
    commands: &'a CommandMap,
    name: &str,
    insensitive: bool,
) -> Option<&'a Arc<LoadedCommand>> {
    match commands.get(name) {
        Some(cmd) => Some(cmd),
        None if insensitive => {
            let name = name.to_lowercase();

            commands
                .iter()
                .find(|(key, _)| key.to_lowercase() == name)
                .map(|(_, cmd)| cmd)
        }
        None => None,
    }
}

/// Finds the deepest command matching the tokens of `content`. Returns the
/// command and the untouched rest of `content`.
pub fn find_command<'a>(
    commands: &CommandMap,
    content: &'a str,
    insensitive: bool,
) -> Option<(Arc<LoadedCommand>, &'a str)> {
    let (token, mut rest) = split_token(content);
    let mut command = lookup(commands, token, insensitive)?.clone();

    loop {
        let (token, next) = split_token(rest.trim_start());
        if token.is_empty() {
            break;
        }

        match lookup(&command.sub_commands, token, command.insensitive_commands) {
            Some(cmd) => {
                let cmd = cmd.clone();
                command = cmd;
                rest = next;
            }
            None => break,
        }
    }

    Some((command, rest))
}
