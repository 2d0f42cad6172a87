// Testing utilities and fakes for the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use med_alert_data::repository::{Collection, InMemoryStore, LocalStore, RemoteStore, Session, StoreError};

use crate::sync::Reconciler;

/// Remote store fake that can be switched into failure modes
#[derive(Debug, Clone, Default)]
pub struct FlakyRemoteStore {
    inner: InMemoryStore,
    offline: Arc<AtomicBool>,
    reject_writes: Arc<AtomicBool>,
}

impl FlakyRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every operation with a network error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail writes with a backend error; reads still succeed
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Network("remote store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Collection> RemoteStore<C> for FlakyRemoteStore {
    async fn fetch(&self, session: &Session) -> Result<Option<C>, StoreError> {
        self.check_online()?;
        RemoteStore::<C>::fetch(&self.inner, session).await
    }

    async fn write(&self, session: &Session, value: &C) -> Result<(), StoreError> {
        self.check_online()?;
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write rejected".to_string()));
        }
        RemoteStore::<C>::write(&self.inner, session, value).await
    }
}

/// In-memory local cache that yields to the scheduler before every
/// operation, so concurrent callers interleave the way they would against
/// a real database.
#[derive(Debug, Clone, Default)]
pub struct YieldingStore {
    inner: InMemoryStore,
}

impl YieldingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<C: Collection> LocalStore<C> for YieldingStore {
    async fn fetch(&self, scope: &str) -> Result<Option<C>, StoreError> {
        tokio::task::yield_now().await;
        LocalStore::<C>::fetch(&self.inner, scope).await
    }

    async fn write(&self, scope: &str, value: &C) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        LocalStore::<C>::write(&self.inner, scope, value).await
    }
}

/// Reconciler over a yielding cache and a flaky remote
pub fn yielding_reconciler() -> (Reconciler<YieldingStore, FlakyRemoteStore>, Arc<FlakyRemoteStore>) {
    let remote = Arc::new(FlakyRemoteStore::new());
    (Reconciler::new(Arc::new(YieldingStore::new()), Arc::clone(&remote)), remote)
}

/// Reconciler over an in-memory cache and a flaky remote, returning handles to both
pub fn in_memory_reconciler() -> (Reconciler<InMemoryStore, FlakyRemoteStore>, Arc<InMemoryStore>, Arc<FlakyRemoteStore>) {
    let local = Arc::new(InMemoryStore::new());
    let remote = Arc::new(FlakyRemoteStore::new());
    (Reconciler::new(Arc::clone(&local), Arc::clone(&remote)), local, remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{SyncError, Tier};
    use med_alert_data::models::Caregiver;

    #[tokio::test]
    async fn test_offline_remote_fails_load() {
        let (sync, _, remote) = in_memory_reconciler();
        remote.set_offline(true);

        let result = sync.load::<Vec<Caregiver>>(Some(&Session::new("u", "t"))).await;
        assert!(matches!(result, Err(SyncError::Network(_))));
    }

    #[tokio::test]
    async fn test_rejected_write_after_seed_keeps_local_copy() {
        let (sync, local, remote) = in_memory_reconciler();
        remote.set_reject_writes(true);
        let session = Session::new("u", "t");

        let result = sync.load::<Vec<Caregiver>>(Some(&session)).await;
        assert!(matches!(result, Err(SyncError::Backend(_))));

        remote.set_reject_writes(false);
        let loaded = sync.load::<Vec<Caregiver>>(Some(&session)).await.unwrap();
        assert_eq!(loaded.tier, Tier::Local);
        assert!(LocalStore::<Vec<Caregiver>>::fetch(local.as_ref(), "u").await.unwrap().is_some());
    }
}
