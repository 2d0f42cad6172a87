use std::sync::PoisonError;
use thiserror::Error;

#[cfg(feature = "sqlite")]
use crate::database::DatabaseError;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No active user session for a remote write
    #[error("User not authenticated")]
    NotAuthenticated,

    /// Remote store unreachable
    #[error("Network error: {0}")]
    Network(String),

    /// Remote store rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// Local persistence unreadable or unwritable
    #[error("Local storage error: {0}")]
    LocalIo(String),

    /// Stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[cfg(feature = "sqlite")]
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Database setup error
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Store configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(error: PoisonError<T>) -> Self {
        StoreError::Lock(error.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN =>
            {
                StoreError::NotAuthenticated
            }
            Some(status) => StoreError::Backend(format!("{}: {}", status, error)),
            None if error.is_decode() => StoreError::Backend(error.to_string()),
            None => StoreError::Network(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisoned_lock_is_a_lock_error() {
        let mutex = std::sync::Mutex::new(0);
        let _ = std::panic::catch_unwind(|| {
            let _guard = mutex.lock().unwrap();
            panic!("poison");
        });

        let error: StoreError = mutex.lock().unwrap_err().into();
        assert!(matches!(error, StoreError::Lock(_)));
    }
}
