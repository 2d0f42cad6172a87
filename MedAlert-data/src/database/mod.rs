//! SQLite plumbing behind the local record cache

use thiserror::Error;

pub mod connection;
pub mod migrations;

pub use connection::*;

/// Failures opening or migrating the local database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Invalid MEDALERT_* setting
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}
