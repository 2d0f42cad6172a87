//! SQLite connection pool backing the local record cache

use std::fs;
use std::path::Path;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;
use super::DatabaseError;
use crate::config::{env_or, env_string};

/// Pool of SQLite connections
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// Local database configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "./data/medalert.db".to_string(),
            pool_size: 5,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let sqlite_path = env_string("MEDALERT_SQLITE_PATH").unwrap_or(defaults.sqlite_path);
        let pool_size = env_or("MEDALERT_POOL_SIZE", defaults.pool_size)
            .map_err(|e| DatabaseError::ConfigError(e.to_string()))?;
        let timeout_seconds = env_or("MEDALERT_TIMEOUT_SECONDS", defaults.timeout_seconds)
            .map_err(|e| DatabaseError::ConfigError(e.to_string()))?;

        if pool_size == 0 {
            return Err(DatabaseError::ConfigError(
                "MEDALERT_POOL_SIZE must be at least 1".to_string(),
            ));
        }

        info!(
            "Database configuration: path={}, pool_size={}, timeout={}s",
            sqlite_path, pool_size, timeout_seconds
        );

        Ok(Self {
            sqlite_path,
            pool_size,
            timeout_seconds,
        })
    }
}

/// Create the SQLite pool and run migrations.
///
/// Falls back to an in-memory database when the file cannot be opened, so the
/// local tier stays usable for the session.
pub fn create_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    info!("Initializing SQLite database at: {}", config.sqlite_path);

    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory {:?}: {}, falling back to in-memory database", parent, e);
                return create_in_memory_pool(config);
            }
        }
    }

    let manager = SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = match build_pool(manager, config) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            return create_in_memory_pool(config);
        }
    };

    let conn = pool.get()?;
    run_sqlite_migrations(&conn)?;

    info!("SQLite connection pool created successfully");
    Ok(pool)
}

/// Create a pool over a private in-memory database
pub fn create_in_memory_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    // Every connection to `:memory:` opens its own database, so one connection only.
    let single = DatabaseConfig {
        pool_size: 1,
        ..config.clone()
    };
    let pool = build_pool(SqliteConnectionManager::memory(), &single)?;

    let conn = pool.get()?;
    run_sqlite_migrations(&conn)?;

    info!("In-memory SQLite database initialized successfully");
    Ok(pool)
}

fn build_pool(manager: SqliteConnectionManager, config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;
    Ok(pool)
}

/// Describe the database a pool is connected to
pub fn connection_info(pool: &SqlitePool) -> String {
    let location = pool
        .get()
        .ok()
        .and_then(|conn| {
            conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2))
                .ok()
        })
        .map(|path| {
            if path.is_empty() || path == ":memory:" {
                "SQLite in-memory database".to_string()
            } else {
                format!("SQLite database at {}", path)
            }
        })
        .unwrap_or_else(|| "SQLite database (path unknown)".to_string());

    let state = pool.state();
    format!(
        "{} (connections: active={}, idle={})",
        location, state.connections, state.idle_connections
    )
}
