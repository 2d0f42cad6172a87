use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use super::collection::Collection;
use super::errors::StoreError;
use super::store::LocalStore;
use crate::database::{create_sqlite_pool, DatabaseConfig, SqlitePool};

/// Local cache keeping one JSON document per user and record kind in SQLite
#[derive(Clone)]
pub struct SqliteLocalStore {
    pool: SqlitePool,
}

impl SqliteLocalStore {
    /// Wrap an existing, migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database described by the configuration
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = create_sqlite_pool(config)?;
        info!("Local store ready: {}", crate::database::connection_info(&pool));
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl<C: Collection> LocalStore<C> for SqliteLocalStore {
    async fn fetch(&self, scope: &str) -> Result<Option<C>, StoreError> {
        debug!("Reading {} for {} from SQLite", C::KIND, scope);

        let conn = self.pool.get()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM records WHERE user_id = ?1 AND kind = ?2",
                params![scope, C::KIND.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, scope: &str, value: &C) -> Result<(), StoreError> {
        debug!("Writing {} for {} to SQLite", C::KIND, scope);

        let payload = serde_json::to_string(value)?;
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO records (user_id, kind, payload, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, kind) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![scope, C::KIND.as_str(), payload, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }
}
