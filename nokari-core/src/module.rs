//! Runtime loading and unloading of plugins.
//!
//! Plugins are compiled into the binary and listed in a catalog. Loading a
//! plugin runs its load function which registers commands into a
//! [`Registry`]. All commands of a plugin are associated with its
//! [`ModuleId`] and are removed together.
use crate::command::{self, Command, CommandHandler};

use parking_lot::RwLock;
use thiserror::Error;

use std::collections::{BTreeSet, HashMap};
use std::error;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

pub type LoadFn = fn(&mut Registry) -> std::result::Result<(), BoxError>;
pub type UnloadFn = fn() -> std::result::Result<(), BoxError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

#[derive(Debug, Error)]
pub enum Error {
    #[error("no plugin named `{0}`")]
    NotFound(String),
    #[error("plugin `{0}` is already loaded")]
    AlreadyLoaded(String),
    #[error("plugin `{0}` is not loaded")]
    NotLoaded(String),
    #[error("plugin `{0}` is missing a load function")]
    MissingLoad(String),
    #[error("plugin `{0}` is missing an unload function")]
    MissingUnload(String),
    #[error("plugin `{name}` failed: {source}")]
    Failed {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error(transparent)]
    Command(#[from] command::Error),
    #[error("reached the maximum amount of modules")]
    MaxAmountReached,
}

impl Error {
    /// Returns a short name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::AlreadyLoaded(_) => "AlreadyLoaded",
            Self::NotLoaded(_) => "NotLoaded",
            Self::MissingLoad(_) => "MissingLoad",
            Self::MissingUnload(_) => "MissingUnload",
            Self::Failed { .. } => "Failed",
            Self::Command(command::Error::DuplicateName(_)) => "DuplicateName",
            Self::Command(command::Error::InvalidPath) => "InvalidPath",
            Self::MaxAmountReached => "MaxAmountReached",
        }
    }
}

/// Formats an error and all its sources.
pub fn error_chain(err: &dyn error::Error) -> String {
    let mut buf = err.to_string();

    let mut source = err.source();
    while let Some(err) = source {
        buf.push_str(": ");
        buf.push_str(&err.to_string());
        source = err.source();
    }

    buf
}

/// Collects the commands of a plugin while it is loaded.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level command.
    pub fn command(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// An entry in the plugin catalog.
#[derive(Copy, Clone, Debug)]
pub struct PluginEntry {
    pub name: &'static str,
    pub load: Option<LoadFn>,
    pub unload: Option<UnloadFn>,
}

impl PluginEntry {
    pub const fn new(name: &'static str, load: LoadFn, unload: UnloadFn) -> Self {
        Self {
            name,
            load: Some(load),
            unload: Some(unload),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Load,
    Unload,
    Reload,
}

/// The result of running an [`Operation`] on a list of plugins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub succeeded: Vec<String>,
    /// Failed plugins and the kind of error.
    pub failed: Vec<(String, String)>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "```diff")?;

        for name in &self.succeeded {
            writeln!(f, "+ {}", name)?;
        }

        for (name, kind) in &self.failed {
            writeln!(f, "- {} {}", name, kind)?;
        }

        write!(f, "```")
    }
}

/// Parses a list of plugin names separated by commas or whitespace. `*` and
/// `all` select all plugins in `all`.
pub fn parse_targets(input: &str, all: &[&str]) -> Vec<String> {
    let input = input.trim();

    let targets: BTreeSet<String> = if input == "*" || input == "all" {
        all.iter().map(|s| s.to_string()).collect()
    } else {
        input
            .split(',')
            .flat_map(|s| s.split_whitespace())
            .map(|s| s.to_owned())
            .collect()
    };

    let mut targets: Vec<String> = targets.into_iter().collect();
    sort_names(&mut targets);
    targets
}

/// Sorts by length, then alphabetically.
fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}

#[derive(Debug)]
struct InnerPluginManager {
    catalog: Vec<PluginEntry>,
    /// Names of loaded plugins. Held for writing during every operation, so
    /// operations on plugins never overlap.
    loaded: RwLock<HashMap<String, ModuleId>>,
    counter: AtomicU32,
    command_handler: CommandHandler,
}

#[derive(Clone, Debug)]
pub struct PluginManager {
    inner: Arc<InnerPluginManager>,
}

impl PluginManager {
    pub fn new(command_handler: CommandHandler, catalog: Vec<PluginEntry>) -> Self {
        Self {
            inner: Arc::new(InnerPluginManager {
                catalog,
                loaded: RwLock::default(),
                counter: AtomicU32::new(0),
                command_handler,
            }),
        }
    }

    /// Returns the names of all plugins in the catalog.
    pub fn names(&self) -> Vec<&'static str> {
        self.inner.catalog.iter().map(|e| e.name).collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.inner.loaded.read().contains_key(name)
    }

    /// Returns the names of all loaded plugins.
    pub fn list_loaded(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.loaded.read().keys().cloned().collect();
        sort_names(&mut names);
        names
    }

    fn entry(&self, name: &str) -> Result<&PluginEntry> {
        self.inner
            .catalog
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    fn build(entry: &PluginEntry) -> Result<Vec<Command>> {
        let load = entry
            .load
            .ok_or_else(|| Error::MissingLoad(entry.name.to_owned()))?;

        let mut registry = Registry::new();
        load(&mut registry).map_err(|source| Error::Failed {
            name: entry.name.to_owned(),
            source,
        })?;

        Ok(registry.into_commands())
    }

    pub fn load(&self, name: &str) -> Result<()> {
        let entry = self.entry(name)?;
        let mut loaded = self.inner.loaded.write();

        if loaded.contains_key(name) {
            return Err(Error::AlreadyLoaded(name.to_owned()));
        }

        let commands = Self::build(entry)?;
        let id = self.generate_id()?;

        self.inner
            .command_handler
            .load_commands(commands, Some(id))?;

        loaded.insert(name.to_owned(), id);
        Ok(())
    }

    pub fn unload(&self, name: &str) -> Result<()> {
        let entry = self.entry(name)?;
        let mut loaded = self.inner.loaded.write();

        let id = *loaded
            .get(name)
            .ok_or_else(|| Error::NotLoaded(name.to_owned()))?;

        let unload = entry
            .unload
            .ok_or_else(|| Error::MissingUnload(name.to_owned()))?;

        unload().map_err(|source| Error::Failed {
            name: name.to_owned(),
            source,
        })?;

        self.inner.command_handler.remove_module(id);
        loaded.remove(name);
        Ok(())
    }

    /// Reloads a plugin. The new commands are built and validated before the
    /// unload hook runs, if either fails the plugin stays loaded unchanged.
    pub fn reload(&self, name: &str) -> Result<()> {
        let entry = self.entry(name)?;
        let loaded = self.inner.loaded.write();

        let id = *loaded
            .get(name)
            .ok_or_else(|| Error::NotLoaded(name.to_owned()))?;

        let unload = entry
            .unload
            .ok_or_else(|| Error::MissingUnload(name.to_owned()))?;

        let commands = Self::build(entry)?;
        let pending = self.inner.command_handler.prepare_replace(id, commands)?;

        unload().map_err(|source| Error::Failed {
            name: name.to_owned(),
            source,
        })?;

        pending.commit();
        Ok(())
    }

    /// Runs `op` on every target. Failing targets don't stop the operation.
    pub fn execute(&self, op: Operation, targets: &[String]) -> Report {
        let mut report = Report::default();

        for target in targets {
            let res = match op {
                Operation::Load => self.load(target),
                Operation::Unload => self.unload(target),
                Operation::Reload => self.reload(target),
            };

            match res {
                Ok(()) => report.succeeded.push(target.clone()),
                Err(err) => {
                    log::error!(
                        "[PLUGIN] Failed to {:?} {}: {}",
                        op,
                        target,
                        error_chain(&err)
                    );
                    report.failed.push((target.clone(), err.kind().to_owned()));
                }
            }
        }

        sort_names(&mut report.succeeded);
        report
            .failed
            .sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.cmp(b)));
        report
    }

    /// Loads all plugins in the catalog. Plugins without a load function and
    /// failing plugins are skipped, already loaded plugins are ignored.
    pub fn load_all(&self) -> Report {
        let mut report = Report::default();

        for entry in &self.inner.catalog {
            match self.load(entry.name) {
                Ok(()) => {
                    log::info!("[PLUGIN] Loaded plugin {}", entry.name);
                    report.succeeded.push(entry.name.to_owned());
                }
                Err(Error::AlreadyLoaded(_)) => (),
                Err(err @ Error::MissingLoad(_)) => {
                    log::warn!("[PLUGIN] {}", err);
                    report
                        .failed
                        .push((entry.name.to_owned(), err.kind().to_owned()));
                }
                Err(err) => {
                    log::error!(
                        "[PLUGIN] Failed to load plugin {}: {}",
                        entry.name,
                        error_chain(&err)
                    );
                    report
                        .failed
                        .push((entry.name.to_owned(), err.kind().to_owned()));
                }
            }
        }

        report
    }

    /// Creates a new unique `ModuleId`.
    fn generate_id(&self) -> Result<ModuleId> {
        let val = self.inner.counter.fetch_add(1, Ordering::SeqCst);

        let val = match val.checked_add(1) {
            Some(val) => val,
            None => return Err(Error::MaxAmountReached),
        };

        Ok(ModuleId(val))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_targets, BoxError, Operation, PluginEntry, PluginManager, Registry, Report,
    };
    use crate::command::{Command, CommandHandler};

    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    static BREAK_BETA: AtomicBool = AtomicBool::new(false);
    static CLASH_DELTA: AtomicBool = AtomicBool::new(false);
    static DELTA_UNLOADS: AtomicUsize = AtomicUsize::new(0);

    fn load_alpha(registry: &mut Registry) -> Result<(), BoxError> {
        let mut cmd = Command::new("alpha");
        cmd.alias("a");
        registry.command(cmd);
        Ok(())
    }

    fn load_broken(_: &mut Registry) -> Result<(), BoxError> {
        Err(io::Error::new(io::ErrorKind::Other, "broken plugin").into())
    }

    fn load_gamma(registry: &mut Registry) -> Result<(), BoxError> {
        registry.command(Command::new("gamma"));
        Ok(())
    }

    fn load_beta(registry: &mut Registry) -> Result<(), BoxError> {
        if BREAK_BETA.load(Ordering::SeqCst) {
            return Err("beta is broken".into());
        }

        registry.command(Command::new("beta"));
        Ok(())
    }

    fn load_delta(registry: &mut Registry) -> Result<(), BoxError> {
        registry.command(Command::new("delta"));
        if CLASH_DELTA.load(Ordering::SeqCst) {
            registry.command(Command::new("ping"));
        }
        Ok(())
    }

    fn unload_delta() -> Result<(), BoxError> {
        DELTA_UNLOADS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn unload() -> Result<(), BoxError> {
        Ok(())
    }

    fn catalog() -> Vec<PluginEntry> {
        vec![
            PluginEntry::new("alpha", load_alpha, unload),
            PluginEntry::new("broken", load_broken, unload),
            PluginEntry::new("gamma", load_gamma, unload),
            PluginEntry {
                name: "noload",
                load: None,
                unload: None,
            },
        ]
    }

    #[test]
    fn test_parse_targets() {
        let all = ["meta", "config", "a"];

        assert_eq!(parse_targets("*", &all), ["a", "meta", "config"]);
        assert_eq!(parse_targets("all", &all), ["a", "meta", "config"]);
        assert_eq!(
            parse_targets("meta, config  x,meta", &all),
            ["x", "meta", "config"]
        );
        assert!(parse_targets(" , ", &all).is_empty());
    }

    #[test]
    fn test_load_all() {
        let commands = CommandHandler::new(true);
        let plugins = PluginManager::new(commands.clone(), catalog());

        let report = plugins.load_all();
        assert_eq!(report.succeeded, ["alpha", "gamma"]);
        assert_eq!(
            report.failed,
            [
                (String::from("broken"), String::from("Failed")),
                (String::from("noload"), String::from("MissingLoad")),
            ]
        );

        assert!(commands.get_by_path("a").is_some());
        assert!(commands.get_by_path("gamma").is_some());
        assert_eq!(plugins.list_loaded(), ["alpha", "gamma"]);

        // Loaded plugins are skipped silently.
        let report = plugins.load_all();
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 2);
    }

    #[test]
    fn test_execute_report() {
        let commands = CommandHandler::new(true);
        let plugins = PluginManager::new(commands.clone(), catalog());

        let targets = parse_targets("alpha, broken, gamma", &plugins.names());
        let report = plugins.execute(Operation::Load, &targets);

        assert_eq!(
            report,
            Report {
                succeeded: vec![String::from("alpha"), String::from("gamma")],
                failed: vec![(String::from("broken"), String::from("Failed"))],
            }
        );
        assert_eq!(
            report.to_string(),
            "```diff\n+ alpha\n+ gamma\n- broken Failed\n```"
        );

        let report = plugins.execute(Operation::Unload, &[String::from("alpha")]);
        assert_eq!(report.succeeded, ["alpha"]);
        assert!(commands.get_by_path("alpha").is_none());
        assert!(!plugins.is_loaded("alpha"));

        let report = plugins.execute(Operation::Unload, &[String::from("alpha")]);
        assert_eq!(
            report.failed,
            [(String::from("alpha"), String::from("NotLoaded"))]
        );
    }

    #[test]
    fn test_reload_keeps_old_commands() {
        let commands = CommandHandler::new(true);
        let plugins = PluginManager::new(
            commands.clone(),
            vec![PluginEntry::new("beta", load_beta, unload)],
        );

        plugins.load("beta").unwrap();
        let old = commands.get_by_path("beta").unwrap();

        BREAK_BETA.store(true, Ordering::SeqCst);
        assert!(plugins.reload("beta").is_err());
        BREAK_BETA.store(false, Ordering::SeqCst);

        // The old command is still loaded.
        let cmd = commands.get_by_path("beta").unwrap();
        assert!(std::sync::Arc::ptr_eq(&old, &cmd));

        plugins.reload("beta").unwrap();
        let cmd = commands.get_by_path("beta").unwrap();
        assert!(!std::sync::Arc::ptr_eq(&old, &cmd));
        assert!(plugins.is_loaded("beta"));
    }

    #[test]
    fn test_reload_conflict_skips_unload() {
        let commands = CommandHandler::new(true);
        commands.load_command(Command::new("ping"), None, None).unwrap();

        let plugins = PluginManager::new(
            commands.clone(),
            vec![PluginEntry::new("delta", load_delta, unload_delta)],
        );
        plugins.load("delta").unwrap();

        CLASH_DELTA.store(true, Ordering::SeqCst);
        let res = plugins.reload("delta");
        CLASH_DELTA.store(false, Ordering::SeqCst);

        assert_eq!(res.unwrap_err().kind(), "DuplicateName");
        assert_eq!(DELTA_UNLOADS.load(Ordering::SeqCst), 0);
        assert!(commands.get_by_path("delta").is_some());
        assert!(commands.get_by_path("ping").unwrap().module_id.is_none());

        plugins.reload("delta").unwrap();
        assert_eq!(DELTA_UNLOADS.load(Ordering::SeqCst), 1);
    }
}
