use crate::check::Check;
use crate::context::MessageContext;
use crate::executor::Executor;
use crate::module::ModuleId;
use crate::router::{find_command, lookup};

use parking_lot::{RwLock, RwLockWriteGuard};
use thiserror::Error;

use std::collections::HashMap;
use std::env;
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Commands keyed by their name and all their aliases.
pub type CommandMap = HashMap<String, Arc<LoadedCommand>>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("a command named `{0}` already exists")]
    DuplicateName(String),
    #[error("invalid command path")]
    InvalidPath,
}

/// A command definition. Once loaded into a [`CommandHandler`] it becomes a
/// [`LoadedCommand`].
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub usage: String,
    pub example: String,
    pub guild_only: bool,
    pub hidden: bool,
    pub disabled: bool,
    /// Copy the checks of this command to every sub command added afterwards.
    pub inherit_checks: bool,
    /// Match sub command names ignoring case.
    pub insensitive_commands: bool,
    pub checks: Vec<Check>,
    pub sub_commands: Vec<Self>,
    pub executor: Option<Executor<MessageContext>>,
}

impl Command {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            usage: String::new(),
            example: String::new(),
            guild_only: false,
            hidden: false,
            disabled: false,
            inherit_checks: true,
            insensitive_commands: false,
            checks: Vec::new(),
            sub_commands: Vec::new(),
            executor: None,
        }
    }

    pub fn set_name<T>(&mut self, name: T)
    where
        T: ToString,
    {
        self.name = name.to_string();
    }

    pub fn set_description<T>(&mut self, description: T)
    where
        T: ToString,
    {
        self.description = description.to_string();
    }

    pub fn set_usage<T>(&mut self, usage: T)
    where
        T: ToString,
    {
        self.usage = usage.to_string();
    }

    pub fn set_example<T>(&mut self, example: T)
    where
        T: ToString,
    {
        self.example = example.to_string();
    }

    /// Marks the command as guild only. This adds a [`Check::GuildOnly`].
    pub fn set_guild_only(&mut self, guild_only: bool) {
        if guild_only && !self.guild_only {
            self.checks.push(Check::GuildOnly);
        } else if !guild_only {
            self.checks.retain(|c| !matches!(c, Check::GuildOnly));
        }

        self.guild_only = guild_only;
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn alias<T>(&mut self, alias: T)
    where
        T: ToString,
    {
        self.aliases.push(alias.to_string());
    }

    pub fn check(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn executor(&mut self, executor: Option<Executor<MessageContext>>) {
        self.executor = executor;
    }

    /// Adds a sub command. If `inherit_checks` is set, the current checks of
    /// this command are appended to the checks of `command`.
    pub fn sub_command(&mut self, mut command: Self) {
        if self.inherit_checks {
            command.checks.extend(self.checks.iter().cloned());
        }

        self.sub_commands.push(command);
    }

    /// Disables the command if any of the environment variables in `vars` is
    /// not set.
    pub fn require_env(&mut self, vars: &[&str]) {
        for var in vars {
            if env::var_os(var).is_none() {
                log::warn!(
                    "[CORE] Missing environment variable {}, disabling command {}",
                    var,
                    self.name
                );
                self.disabled = true;
            }
        }
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("checks", &self.checks)
            .field("sub_commands", &self.sub_commands)
            .finish_non_exhaustive()
    }
}

/// A command inside the tree of a [`CommandHandler`].
#[derive(Clone)]
pub struct LoadedCommand {
    pub name: String,
    pub aliases: Vec<String>,
    /// The names of all parent commands.
    pub parents: Vec<String>,
    pub description: String,
    pub usage: String,
    pub example: String,
    pub guild_only: bool,
    pub hidden: bool,
    pub insensitive_commands: bool,
    pub checks: Vec<Check>,
    pub sub_commands: CommandMap,
    pub executor: Option<Executor<MessageContext>>,
    pub module_id: Option<ModuleId>,
    disabled: Arc<AtomicBool>,
}

impl LoadedCommand {
    fn from(
        command: Command,
        parents: Vec<String>,
        module_id: Option<ModuleId>,
    ) -> Result<Self, Error> {
        let mut path = parents.clone();
        path.push(command.name.clone());

        let mut sub_commands = CommandMap::new();
        for cmd in command.sub_commands {
            let cmd = Self::from(cmd, path.clone(), module_id)?;
            insert_command(&mut sub_commands, Arc::new(cmd))?;
        }

        Ok(Self {
            name: command.name,
            aliases: command.aliases,
            parents,
            description: command.description,
            usage: command.usage,
            example: command.example,
            guild_only: command.guild_only,
            hidden: command.hidden,
            insensitive_commands: command.insensitive_commands,
            checks: command.checks,
            sub_commands,
            executor: command.executor,
            module_id,
            disabled: Arc::new(AtomicBool::new(command.disabled)),
        })
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Sets the disabled flag returning the previous value. The flag is shared
    /// by all copies of this command.
    pub fn set_disabled(&self, disabled: bool) -> bool {
        self.disabled.swap(disabled, Ordering::SeqCst)
    }

    /// Returns the full name of the command including all parents, e.g.
    /// `prefix user`.
    pub fn qualified_name(&self) -> String {
        let mut name = self.parents.join(" ");
        if !name.is_empty() {
            name.push(' ');
        }
        name.push_str(&self.name);
        name
    }

    /// Returns all distinct sub commands sorted by name.
    pub fn list_sub_commands(&self) -> Vec<Arc<Self>> {
        unique(&self.sub_commands)
    }
}

impl Debug for LoadedCommand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("LoadedCommand")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("parents", &self.parents)
            .field("module_id", &self.module_id)
            .field("disabled", &self.is_disabled())
            .finish_non_exhaustive()
    }
}

/// Inserts a command under its name and all aliases. A name colliding with the
/// name of another command is an error, colliding aliases are overwritten.
fn insert_command(map: &mut CommandMap, command: Arc<LoadedCommand>) -> Result<(), Error> {
    if let Some(cmd) = map.get(&command.name) {
        if cmd.name == command.name {
            return Err(Error::DuplicateName(command.name.clone()));
        }
    }

    map.insert(command.name.clone(), command.clone());
    for alias in &command.aliases {
        map.insert(alias.clone(), command.clone());
    }

    Ok(())
}

fn unique(map: &CommandMap) -> Vec<Arc<LoadedCommand>> {
    let mut commands: Vec<_> = map
        .iter()
        .filter(|(key, cmd)| **key == cmd.name)
        .map(|(_, cmd)| cmd.clone())
        .collect();

    commands.sort_by(|a, b| a.name.cmp(&b.name));
    commands
}

/// Runs `f` on the sub commands of the command at `path`. Every command on the
/// path is copied and replaced under all its keys, so readers holding an
/// older `Arc` are not affected.
fn with_group<F, R>(map: &mut CommandMap, path: &[&str], f: F) -> Result<R, Error>
where
    F: FnOnce(&mut CommandMap) -> Result<R, Error>,
{
    let (first, rest) = match path.split_first() {
        Some(val) => val,
        None => return f(map),
    };

    let node = map.get(*first).cloned().ok_or(Error::InvalidPath)?;

    let mut group = (*node).clone();
    let res = with_group(&mut group.sub_commands, rest, f)?;

    let group = Arc::new(group);
    for cmd in map.values_mut() {
        if Arc::ptr_eq(cmd, &node) {
            *cmd = group.clone();
        }
    }

    Ok(res)
}

fn split_path(path: Option<&str>) -> Vec<&str> {
    path.map(|p| p.split_whitespace().collect())
        .unwrap_or_default()
}

#[derive(Clone, Debug)]
pub struct CommandHandler {
    inner: Arc<RwLock<CommandMap>>,
    insensitive: bool,
}

impl CommandHandler {
    /// Creates a new `CommandHandler` with no commands
    /// loaded. If `insensitive` is `true`, top-level commands are
    /// matched ignoring case.
    pub fn new(insensitive: bool) -> Self {
        Self {
            inner: Arc::default(),
            insensitive,
        }
    }

    pub fn insensitive(&self) -> bool {
        self.insensitive
    }

    /// Loads a single command. If `path` is `None`, the command
    /// will be loaded in this scope.
    pub fn load_command(
        &self,
        command: Command,
        path: Option<&str>,
        module_id: Option<ModuleId>,
    ) -> Result<(), Error> {
        let path = split_path(path);
        let mut commands = self.inner.write();

        with_group(&mut commands, &path, |map| {
            let parents = path.iter().map(|s| s.to_string()).collect();
            let command = LoadedCommand::from(command, parents, module_id)?;
            insert_command(map, Arc::new(command))
        })
    }

    /// Loads all `commands` at the top level. Either all commands are loaded
    /// or none.
    pub fn load_commands(
        &self,
        commands: Vec<Command>,
        module_id: Option<ModuleId>,
    ) -> Result<(), Error> {
        let mut map = self.inner.write();
        let mut new_map = map.clone();

        for command in commands {
            let command = LoadedCommand::from(command, Vec::new(), module_id)?;
            insert_command(&mut new_map, Arc::new(command))?;
        }

        *map = new_map;
        Ok(())
    }

    /// Replaces all top-level commands of `module_id` with `commands`. If
    /// loading any of the new commands fails, the old commands are kept.
    pub fn replace_commands(
        &self,
        module_id: ModuleId,
        commands: Vec<Command>,
    ) -> Result<(), Error> {
        self.prepare_replace(module_id, commands)?.commit();
        Ok(())
    }

    /// Builds the tree with all top-level commands of `module_id` replaced by
    /// `commands` without applying it. The write lock is held until the
    /// returned [`PendingReplace`] is committed or dropped.
    pub fn prepare_replace(
        &self,
        module_id: ModuleId,
        commands: Vec<Command>,
    ) -> Result<PendingReplace<'_>, Error> {
        let guard = self.inner.write();

        let mut map = guard.clone();
        map.retain(|_, cmd| cmd.module_id != Some(module_id));

        for command in commands {
            let command = LoadedCommand::from(command, Vec::new(), Some(module_id))?;
            insert_command(&mut map, Arc::new(command))?;
        }

        Ok(PendingReplace { guard, map })
    }

    /// Removes the command with the given `ident`. If a path is provided,
    /// the path will be used to find the parent command.
    pub fn remove_command(&self, ident: &str, path: Option<&str>) -> Result<(), Error> {
        let path = split_path(path);
        let mut commands = self.inner.write();

        with_group(&mut commands, &path, |map| {
            let command = map.get(ident).cloned().ok_or(Error::InvalidPath)?;
            map.retain(|_, cmd| !Arc::ptr_eq(cmd, &command));
            Ok(())
        })
    }

    /// Removes all top-level commands loaded by the module.
    pub fn remove_module(&self, module_id: ModuleId) {
        let mut commands = self.inner.write();
        commands.retain(|_, cmd| cmd.module_id != Some(module_id));
    }

    /// Finds the command invoked by `content`, returning the command and the
    /// remaining arguments.
    pub fn get_command<'a>(&self, content: &'a str) -> Option<(Arc<LoadedCommand>, &'a str)> {
        let commands = self.inner.read();
        find_command(&commands, content, self.insensitive)
    }

    /// Returns the command at exactly `path`, e.g. `prefix user`.
    pub fn get_by_path(&self, path: &str) -> Option<Arc<LoadedCommand>> {
        let commands = self.inner.read();

        let mut segments = path.split_whitespace();
        let mut command = lookup(&commands, segments.next()?, self.insensitive)?.clone();

        for segment in segments {
            command =
                lookup(&command.sub_commands, segment, command.insensitive_commands)?.clone();
        }

        Some(command)
    }

    /// Returns all distinct top-level commands sorted by name.
    pub fn list_commands(&self) -> Vec<Arc<LoadedCommand>> {
        let commands = self.inner.read();
        unique(&commands)
    }
}

/// A validated replacement returned by [`CommandHandler::prepare_replace`].
/// Dropping it keeps the current commands.
pub struct PendingReplace<'a> {
    guard: RwLockWriteGuard<'a, CommandMap>,
    map: CommandMap,
}

impl<'a> PendingReplace<'a> {
    pub fn commit(mut self) {
        *self.guard = self.map;
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new(true)
    }
}
