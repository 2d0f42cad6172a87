// MedAlert Data
// Record models, the local and remote stores, and their seed data

// Environment configuration
pub mod config;

// Local SQLite database management
#[cfg(feature = "sqlite")]
pub mod database;

// Record models
pub mod models;

// Store traits and implementations
pub mod repository;

// Built-in bootstrap records
pub mod seed;

pub use config::{RemoteConfig, StoreConfig};
pub use repository::{Collection, LocalStore, RecordKind, RemoteStore, Session, StoreError};
pub use seed::Seed;
