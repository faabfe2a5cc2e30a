use crate::command::CommandHandler;
use crate::config::Config;
use crate::hook::HookController;
use crate::module::{PluginEntry, PluginManager};
use crate::responses::ResponseCache;
use crate::store::{self, PrefixStore};

use nokari::model::id::UserId;

use parking_lot::RwLock;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The global shared state.
pub struct State {
    pub config: Config,
    commands: CommandHandler,
    plugins: PluginManager,
    hooks: HookController,
    responses: ResponseCache,
    store: Arc<dyn PrefixStore>,
    /// Custom prefixes of guilds and users, keyed by their id.
    prefixes: RwLock<HashMap<u64, Vec<String>>>,
    pub start_time: Instant,
}

impl State {
    pub fn new(config: Config, store: Arc<dyn PrefixStore>, catalog: Vec<PluginEntry>) -> Self {
        let commands = CommandHandler::new(config.insensitive_commands);
        let plugins = PluginManager::new(commands.clone(), catalog);
        let responses = ResponseCache::new(config.message_cache_size);

        Self {
            config,
            commands,
            plugins,
            hooks: HookController::new(),
            responses,
            store,
            prefixes: RwLock::default(),
            start_time: Instant::now(),
        }
    }

    /// Returns a reference to the internal [`CommandHandler`].
    pub fn commands(&self) -> &CommandHandler {
        &self.commands
    }

    /// Returns a reference to the internal [`PluginManager`].
    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn hooks(&self) -> &HookController {
        &self.hooks
    }

    /// Returns the responses of recent command invocations.
    pub fn responses(&self) -> &ResponseCache {
        &self.responses
    }

    pub fn store(&self) -> &dyn PrefixStore {
        self.store.as_ref()
    }

    /// Returns the custom prefixes of a guild or user.
    pub fn prefixes(&self, hash: u64) -> Option<Vec<String>> {
        self.prefixes.read().get(&hash).cloned()
    }

    pub fn set_prefixes(&self, hash: u64, prefixes: Vec<String>) {
        let mut map = self.prefixes.write();

        if prefixes.is_empty() {
            map.remove(&hash);
        } else {
            map.insert(hash, prefixes);
        }
    }

    /// Replaces the cached prefixes with the contents of the store.
    pub async fn load_prefixes(&self) -> store::Result<()> {
        let prefixes = self.store.load_all().await?;
        log::debug!("[CORE] Loaded prefixes of {} entries", prefixes.len());

        *self.prefixes.write() = prefixes;
        Ok(())
    }

    /// Toggles `prefix` for a guild or user in the store and updates the
    /// cache. Returns the new prefixes.
    pub async fn toggle_prefix(&self, hash: u64, prefix: &str) -> store::Result<Vec<String>> {
        let prefixes = self.store.toggle(hash, prefix).await?;
        self.set_prefixes(hash, prefixes.clone());
        Ok(prefixes)
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.config.owners.contains(&user_id)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::State;
    use crate::config::Config;
    use crate::store::mem::MemStore;

    use nokari::model::id::UserId;

    use std::sync::Arc;

    #[tokio::test]
    async fn test_toggle_prefix() {
        let store = MemStore::new();
        let state = State::new(Config::default(), Arc::new(store.clone()), vec![]);

        assert_eq!(state.toggle_prefix(1, "?").await.unwrap(), ["?"]);
        assert_eq!(state.prefixes(1).unwrap(), ["?"]);

        assert!(state.toggle_prefix(1, "?").await.unwrap().is_empty());
        assert!(state.prefixes(1).is_none());

        // State created from an existing store.
        state.toggle_prefix(2, "n?").await.unwrap();
        let state = State::new(Config::default(), Arc::new(store), vec![]);
        assert!(state.prefixes(2).is_none());

        state.load_prefixes().await.unwrap();
        assert_eq!(state.prefixes(2).unwrap(), ["n?"]);
    }

    #[test]
    fn test_is_owner() {
        let mut config = Config::default();
        config.owners.push(UserId(1));

        let state = State::new(config, Arc::new(MemStore::new()), vec![]);
        assert!(state.is_owner(UserId(1)));
        assert!(!state.is_owner(UserId(2)));
    }
}
