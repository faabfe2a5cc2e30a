use super::{toggle_prefix, PrefixStore, Result};

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{mysql::MySqlPool, Row};

use std::collections::HashMap;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS prefixes (
    hash BIGINT UNSIGNED NOT NULL,
    position INT UNSIGNED NOT NULL,
    prefix VARCHAR(255) NOT NULL,
    PRIMARY KEY (hash, position)
)";

/// A [`PrefixStore`] using the MySQL database.
#[derive(Clone, Debug)]
pub struct MysqlStore {
    pool: MySqlPool,
}

impl MysqlStore {
    pub async fn connect(uri: &str) -> Result<Self> {
        let pool = MySqlPool::connect(uri).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PrefixStore for MysqlStore {
    async fn create_tables(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;

        Ok(())
    }

    async fn load_all(&self) -> Result<HashMap<u64, Vec<String>>> {
        let mut rows = sqlx::query("SELECT hash, prefix FROM prefixes ORDER BY hash, position")
            .fetch(&self.pool);

        let mut prefixes: HashMap<u64, Vec<String>> = HashMap::new();
        while let Some(row) = rows.try_next().await? {
            let hash: u64 = row.try_get("hash")?;
            let prefix: String = row.try_get("prefix")?;

            prefixes.entry(hash).or_default().push(prefix);
        }

        Ok(prefixes)
    }

    async fn toggle(&self, hash: u64, prefix: &str) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT prefix FROM prefixes WHERE hash = ? ORDER BY position FOR UPDATE",
        )
        .bind(hash)
        .fetch_all(&mut tx)
        .await?;

        let mut prefixes = Vec::with_capacity(rows.len() + 1);
        for row in rows {
            prefixes.push(row.try_get::<String, _>("prefix")?);
        }

        toggle_prefix(&mut prefixes, prefix);

        sqlx::query("DELETE FROM prefixes WHERE hash = ?")
            .bind(hash)
            .execute(&mut tx)
            .await?;

        for (position, prefix) in prefixes.iter().enumerate() {
            sqlx::query("INSERT INTO prefixes (hash, position, prefix) VALUES (?, ?, ?)")
                .bind(hash)
                .bind(position as u32)
                .bind(prefix)
                .execute(&mut tx)
                .await?;
        }

        tx.commit().await?;

        Ok(prefixes)
    }
}
