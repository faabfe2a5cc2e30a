//! Persistent storage of custom prefixes.
//!
//! Guild and user prefixes share one table, keyed by the snowflake of the
//! guild or user (the "hash").
pub mod mem;
pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

use std::collections::HashMap;
use std::result;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[async_trait]
pub trait PrefixStore: Send + Sync {
    /// Creates all tables used by the store.
    async fn create_tables(&self) -> Result<()>;

    /// Returns the prefixes of all guilds and users.
    async fn load_all(&self) -> Result<HashMap<u64, Vec<String>>>;

    /// Removes `prefix` from the prefixes of `hash` if it exists, otherwise
    /// appends it. Returns the new prefixes.
    async fn toggle(&self, hash: u64, prefix: &str) -> Result<Vec<String>>;
}

/// Removes `prefix` from `prefixes` or appends it if it doesn't exist.
pub(crate) fn toggle_prefix(prefixes: &mut Vec<String>, prefix: &str) {
    match prefixes.iter().position(|p| p == prefix) {
        Some(index) => {
            prefixes.remove(index);
        }
        None => prefixes.push(prefix.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::toggle_prefix;

    #[test]
    fn test_toggle_prefix() {
        let mut prefixes = vec![String::from("n!"), String::from("?")];

        toggle_prefix(&mut prefixes, "!");
        assert_eq!(prefixes, ["n!", "?", "!"]);

        toggle_prefix(&mut prefixes, "n!");
        assert_eq!(prefixes, ["?", "!"]);
    }
}
