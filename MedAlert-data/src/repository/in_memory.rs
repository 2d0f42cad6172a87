use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::collection::{Collection, RecordKind};
use super::errors::StoreError;
use super::store::{LocalStore, RemoteStore, Session};

/// In-memory store holding one JSON document per user scope and record kind.
///
/// Serves as the local cache when no database is configured and as the
/// remote stand-in when no remote URL is configured. As a remote it scopes
/// every document by the session's user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<Mutex<HashMap<(String, RecordKind), Value>>>,
    writes: Arc<Mutex<HashMap<RecordKind, usize>>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a value under `scope`
    pub fn with_value<C: Collection>(scope: &str, value: &C) -> Result<Self, StoreError> {
        let store = Self::new();
        store.put(scope, value)?;
        Ok(store)
    }

    /// Number of writes received for a kind, across every scope
    pub fn write_count(&self, kind: RecordKind) -> usize {
        self.writes
            .lock()
            .map(|writes| writes.get(&kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn get<C: Collection>(&self, scope: &str) -> Result<Option<C>, StoreError> {
        let documents = self.documents.lock()?;
        match documents.get(&(scope.to_string(), C::KIND)) {
            Some(document) => Ok(Some(serde_json::from_value(document.clone())?)),
            None => Ok(None),
        }
    }

    fn put<C: Collection>(&self, scope: &str, value: &C) -> Result<(), StoreError> {
        let document = serde_json::to_value(value)?;
        self.documents.lock()?.insert((scope.to_string(), C::KIND), document);
        Ok(())
    }

    fn record_write(&self, kind: RecordKind) -> Result<(), StoreError> {
        *self.writes.lock()?.entry(kind).or_insert(0) += 1;
        Ok(())
    }
}

#[async_trait]
impl<C: Collection> LocalStore<C> for InMemoryStore {
    async fn fetch(&self, scope: &str) -> Result<Option<C>, StoreError> {
        debug!("Reading {} for {} from memory", C::KIND, scope);
        self.get(scope)
    }

    async fn write(&self, scope: &str, value: &C) -> Result<(), StoreError> {
        debug!("Writing {} for {} to memory", C::KIND, scope);
        self.put(scope, value)?;
        self.record_write(C::KIND)
    }
}

#[async_trait]
impl<C: Collection> RemoteStore<C> for InMemoryStore {
    async fn fetch(&self, session: &Session) -> Result<Option<C>, StoreError> {
        debug!("Reading {} from memory for user {}", C::KIND, session.user_id);
        self.get(&session.user_id)
    }

    async fn write(&self, session: &Session, value: &C) -> Result<(), StoreError> {
        debug!("Writing {} to memory for user {}", C::KIND, session.user_id);
        self.put(&session.user_id, value)?;
        self.record_write(C::KIND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Medication;
    use crate::seed::Seed;

    #[tokio::test]
    async fn test_fetch_before_write_is_none() {
        let store = InMemoryStore::new();
        let fetched = LocalStore::<Vec<Medication>>::fetch(&store, "user-1").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_write_then_fetch() {
        let store = InMemoryStore::new();
        let medications = Vec::<Medication>::seed();

        LocalStore::write(&store, "user-1", &medications).await.unwrap();
        let fetched = LocalStore::<Vec<Medication>>::fetch(&store, "user-1").await.unwrap();

        assert_eq!(fetched, Some(medications));
        assert_eq!(store.write_count(RecordKind::Medications), 1);
        assert_eq!(store.write_count(RecordKind::Caregivers), 0);
    }

    #[tokio::test]
    async fn test_clones_share_documents() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        let session = Session::new("user-1", "token");

        RemoteStore::write(&clone, &session, &Vec::<Medication>::seed()).await.unwrap();
        let fetched = RemoteStore::<Vec<Medication>>::fetch(&store, &session).await.unwrap();

        assert!(fetched.is_some_and(|meds| !meds.is_empty()));
    }

    #[tokio::test]
    async fn test_scopes_do_not_share_documents() {
        let store = InMemoryStore::new();
        let alice = Session::new("alice", "token-a");
        let bob = Session::new("bob", "token-b");

        LocalStore::write(&store, "alice", &Vec::<Medication>::seed()).await.unwrap();
        RemoteStore::write(&store, &alice, &Vec::<Medication>::seed()).await.unwrap();

        assert!(LocalStore::<Vec<Medication>>::fetch(&store, "bob").await.unwrap().is_none());
        assert!(RemoteStore::<Vec<Medication>>::fetch(&store, &bob).await.unwrap().is_none());
        assert!(RemoteStore::<Vec<Medication>>::fetch(&store, &alice).await.unwrap().is_some());
    }
}
