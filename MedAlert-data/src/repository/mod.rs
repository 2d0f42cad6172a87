// Repository module structure
pub mod collection;
pub mod errors;
mod in_memory;
mod store;

#[cfg(feature = "remote")]
mod remote;
#[cfg(feature = "sqlite")]
mod sqlite;

// Re-export commonly used types
pub use collection::{Collection, Record, RecordKind};
pub use errors::StoreError;
pub use in_memory::InMemoryStore;
pub use store::{local_scope, LocalStore, RemoteStore, Session, ANONYMOUS_SCOPE};

#[cfg(feature = "remote")]
pub use remote::{fetch_query, upsert_rows, RestRemoteStore};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLocalStore;
