use super::{toggle_prefix, PrefixStore, Result};

use async_trait::async_trait;
use parking_lot::RwLock;

use std::collections::HashMap;
use std::sync::Arc;

/// A [`PrefixStore`] that keeps all entries in memory.
#[derive(Clone, Debug, Default)]
pub struct MemStore {
    inner: Arc<RwLock<HashMap<u64, Vec<String>>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrefixStore for MemStore {
    async fn create_tables(&self) -> Result<()> {
        Ok(())
    }

    async fn load_all(&self) -> Result<HashMap<u64, Vec<String>>> {
        Ok(self.inner.read().clone())
    }

    async fn toggle(&self, hash: u64, prefix: &str) -> Result<Vec<String>> {
        let mut inner = self.inner.write();

        let prefixes = inner.entry(hash).or_default();
        toggle_prefix(prefixes, prefix);

        Ok(prefixes.clone())
    }
}
