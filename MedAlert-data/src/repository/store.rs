use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::errors::StoreError;

/// An authenticated user session, scoping every remote operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity of the signed-in user
    pub user_id: String,

    /// Bearer token presented to the remote store
    pub access_token: String,

    /// Email the user signed in with, if known
    pub email: Option<String>,

    /// Display name from the identity provider, if known
    pub full_name: Option<String>,
}

impl Session {
    /// Create a session with just an identity and token
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            email: None,
            full_name: None,
        }
    }
}

/// Local scope used when no user is signed in
pub const ANONYMOUS_SCOPE: &str = "anonymous";

/// Key under which a user's documents live in the local cache
pub fn local_scope(session: Option<&Session>) -> &str {
    session.map_or(ANONYMOUS_SCOPE, |s| s.user_id.as_str())
}

/// Device-local cache for one record kind, partitioned by user scope
#[async_trait]
pub trait LocalStore<C: Collection>: Send + Sync {
    /// Read what is cached for `scope`; `None` when nothing was ever written
    async fn fetch(&self, scope: &str) -> Result<Option<C>, StoreError>;

    /// Replace the value cached for `scope`
    async fn write(&self, scope: &str, value: &C) -> Result<(), StoreError>;
}

/// Authoritative store for one record kind, scoped to the session's user
#[async_trait]
pub trait RemoteStore<C: Collection>: Send + Sync {
    /// Read the user's records; `None` or an empty list when there are none
    async fn fetch(&self, session: &Session) -> Result<Option<C>, StoreError>;

    /// Upsert the user's records
    async fn write(&self, session: &Session, value: &C) -> Result<(), StoreError>;
}
