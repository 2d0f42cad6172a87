//! Reconciliation between the remote authoritative store and the local cache.
//!
//! Reads prefer the remote store, fall back to the local cache, and finally
//! to seed data. Seed data is written back so both stores converge; a value
//! served from the local cache is returned as is.
//!
//! Local documents are partitioned by the signed-in user, so one user's
//! cache never answers for another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use med_alert_data::repository::{
    local_scope, Collection, LocalStore, RecordKind, RemoteStore, Session, StoreError,
};
use med_alert_data::Seed;

/// Errors surfaced by the reconciliation policy
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    /// A remote operation was attempted without a valid session
    #[error("User not authenticated")]
    NotAuthenticated,

    /// The remote store could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The remote store rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// The local cache could not be read or written
    #[error("Local storage error: {0}")]
    LocalIo(String),
}

impl From<StoreError> for SyncError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotAuthenticated => SyncError::NotAuthenticated,
            StoreError::Network(msg) => SyncError::Network(msg),
            StoreError::Backend(msg) => SyncError::Backend(msg),
            other => SyncError::LocalIo(other.to_string()),
        }
    }
}

/// Which store supplied a loaded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Remote,
    Local,
    Seed,
}

/// A loaded value tagged with its source tier
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<C> {
    pub value: C,
    pub tier: Tier,
}

type WriteLocks = HashMap<(String, RecordKind), Arc<AsyncMutex<()>>>;

/// Read/fallback/write-back policy over a local and a remote store
pub struct Reconciler<L, R> {
    local: Arc<L>,
    remote: Arc<R>,
    locks: Arc<Mutex<WriteLocks>>,
}

impl<L, R> Clone for Reconciler<L, R> {
    fn clone(&self) -> Self {
        Self {
            local: Arc::clone(&self.local),
            remote: Arc::clone(&self.remote),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<L, R> Reconciler<L, R> {
    pub fn new(local: Arc<L>, remote: Arc<R>) -> Self {
        Self {
            local,
            remote,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Exclusive write access to one user's list of a kind.
    ///
    /// Hold the guard across a load-modify-save sequence; clones of this
    /// reconciler share the same locks.
    pub async fn write_lock<C: Collection>(&self, session: Option<&Session>) -> Result<OwnedMutexGuard<()>, SyncError> {
        let key = (local_scope(session).to_string(), C::KIND);
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|e| SyncError::LocalIo(format!("write lock poisoned: {}", e)))?;
            Arc::clone(locks.entry(key).or_default())
        };
        Ok(lock.lock_owned().await)
    }

    /// Load a kind, bootstrapping it from its built-in seed when both stores are empty
    pub async fn load<C>(&self, session: Option<&Session>) -> Result<Loaded<C>, SyncError>
    where
        C: Seed,
        L: LocalStore<C>,
        R: RemoteStore<C>,
    {
        self.load_or_seed(session, C::seed).await
    }

    /// Load a kind, bootstrapping it from `seed` when both stores are empty.
    ///
    /// A remote read error is returned as is; only an empty remote result
    /// falls through to the local cache.
    pub async fn load_or_seed<C, F>(&self, session: Option<&Session>, seed: F) -> Result<Loaded<C>, SyncError>
    where
        C: Collection,
        L: LocalStore<C>,
        R: RemoteStore<C>,
        F: FnOnce() -> C + Send,
    {
        if let Some(value) = self.fetch_remote::<C>(session).await? {
            if !value.is_vacant() {
                debug!("Loaded {} from remote store", C::KIND);
                return Ok(Loaded { value, tier: Tier::Remote });
            }
        }

        if let Some(value) = LocalStore::<C>::fetch(self.local.as_ref(), local_scope(session)).await? {
            if !value.is_vacant() {
                info!("Remote store empty for {}, using local cache", C::KIND);
                return Ok(Loaded { value, tier: Tier::Local });
            }
        }

        info!("No stored {} found, bootstrapping seed data", C::KIND);
        let value = seed();
        self.save(session, &value).await?;
        Ok(Loaded { value, tier: Tier::Seed })
    }

    /// Persist a value locally, then remotely.
    ///
    /// A remote failure is returned after the local write has landed; the
    /// local write is not rolled back.
    pub async fn save<C>(&self, session: Option<&Session>, value: &C) -> Result<(), SyncError>
    where
        C: Collection,
        L: LocalStore<C>,
        R: RemoteStore<C>,
    {
        LocalStore::<C>::write(self.local.as_ref(), local_scope(session), value).await?;

        let Some(session) = session else {
            warn!("Saved {} locally only: no active session", C::KIND);
            return Err(SyncError::NotAuthenticated);
        };

        if let Err(e) = RemoteStore::<C>::write(self.remote.as_ref(), session, value).await {
            warn!("Remote write of {} failed after local write: {}", C::KIND, e);
            return Err(e.into());
        }

        debug!("Saved {} to both stores", C::KIND);
        Ok(())
    }

    async fn fetch_remote<C>(&self, session: Option<&Session>) -> Result<Option<C>, SyncError>
    where
        C: Collection,
        R: RemoteStore<C>,
    {
        match session {
            Some(session) => Ok(RemoteStore::<C>::fetch(self.remote.as_ref(), session).await?),
            None => {
                debug!("No session, skipping remote read of {}", C::KIND);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use med_alert_data::models::{Medication, UserProfile};
    use med_alert_data::repository::{InMemoryStore, ANONYMOUS_SCOPE};
    use mockall::mock;

    mock! {
        pub Remote {}

        #[async_trait]
        impl RemoteStore<Vec<Medication>> for Remote {
            async fn fetch(&self, session: &Session) -> Result<Option<Vec<Medication>>, StoreError>;
            async fn write(&self, session: &Session, value: &Vec<Medication>) -> Result<(), StoreError>;
        }
    }

    mock! {
        pub Local {}

        #[async_trait]
        impl LocalStore<Vec<Medication>> for Local {
            async fn fetch(&self, scope: &str) -> Result<Option<Vec<Medication>>, StoreError>;
            async fn write(&self, scope: &str, value: &Vec<Medication>) -> Result<(), StoreError>;
        }
    }

    fn session() -> Session {
        Session::new("user-1", "token")
    }

    fn one_medication() -> Vec<Medication> {
        let mut meds = Vec::<Medication>::seed();
        meds.truncate(1);
        meds[0].name = "Cached".to_string();
        meds
    }

    #[tokio::test]
    async fn test_remote_data_wins() {
        let mut remote = MockRemote::new();
        remote.expect_fetch().times(1).returning(|_| Ok(Some(one_medication())));
        remote.expect_write().never();

        let mut local = MockLocal::new();
        local.expect_fetch().never();
        local.expect_write().never();

        let reconciler = Reconciler::new(Arc::new(local), Arc::new(remote));
        let loaded: Loaded<Vec<Medication>> = reconciler.load(Some(&session())).await.unwrap();

        assert_eq!(loaded.tier, Tier::Remote);
        assert_eq!(loaded.value[0].name, "Cached");
    }

    #[tokio::test]
    async fn test_local_fallback_writes_nothing() {
        let mut remote = MockRemote::new();
        remote.expect_fetch().times(1).returning(|_| Ok(Some(Vec::new())));
        remote.expect_write().never();

        let mut local = MockLocal::new();
        local
            .expect_fetch()
            .withf(|scope| scope == "user-1")
            .times(1)
            .returning(|_| Ok(Some(one_medication())));
        local.expect_write().never();

        let reconciler = Reconciler::new(Arc::new(local), Arc::new(remote));
        let loaded: Loaded<Vec<Medication>> = reconciler.load(Some(&session())).await.unwrap();

        assert_eq!(loaded.tier, Tier::Local);
        assert_eq!(loaded.value, one_medication());
    }

    #[tokio::test]
    async fn test_seed_written_once_to_each_store() {
        let mut remote = MockRemote::new();
        remote.expect_fetch().times(1).returning(|_| Ok(None));
        remote
            .expect_write()
            .withf(|_, value| *value == Vec::<Medication>::seed())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut local = MockLocal::new();
        local.expect_fetch().times(1).returning(|_| Ok(None));
        local
            .expect_write()
            .withf(|scope, value| scope == "user-1" && *value == Vec::<Medication>::seed())
            .times(1)
            .returning(|_, _| Ok(()));

        let reconciler = Reconciler::new(Arc::new(local), Arc::new(remote));
        let loaded: Loaded<Vec<Medication>> = reconciler.load(Some(&session())).await.unwrap();

        assert_eq!(loaded.tier, Tier::Seed);
        assert_eq!(loaded.value, Vec::<Medication>::seed());
    }

    #[tokio::test]
    async fn test_remote_fetch_error_is_not_swallowed() {
        let mut remote = MockRemote::new();
        remote
            .expect_fetch()
            .times(1)
            .returning(|_| Err(StoreError::Network("connection reset".to_string())));

        let mut local = MockLocal::new();
        local.expect_fetch().never();

        let reconciler = Reconciler::new(Arc::new(local), Arc::new(remote));
        let result: Result<Loaded<Vec<Medication>>, _> = reconciler.load(Some(&session())).await;

        assert_eq!(result, Err(SyncError::Network("connection reset".to_string())));
    }

    #[tokio::test]
    async fn test_remote_write_failure_keeps_local_write() {
        let mut remote = MockRemote::new();
        remote
            .expect_write()
            .times(1)
            .returning(|_, _| Err(StoreError::Backend("500".to_string())));

        let local = Arc::new(InMemoryStore::new());
        let reconciler = Reconciler::new(Arc::clone(&local), Arc::new(remote));

        let result = reconciler.save(Some(&session()), &one_medication()).await;
        assert!(matches!(result, Err(SyncError::Backend(_))));

        let cached = LocalStore::<Vec<Medication>>::fetch(local.as_ref(), "user-1").await.unwrap();
        assert_eq!(cached, Some(one_medication()));
    }

    #[tokio::test]
    async fn test_no_session_reads_local_and_refuses_remote_write() {
        let local = Arc::new(InMemoryStore::with_value(ANONYMOUS_SCOPE, &one_medication()).unwrap());
        let remote = Arc::new(InMemoryStore::new());
        let reconciler = Reconciler::new(Arc::clone(&local), Arc::clone(&remote));

        let loaded: Loaded<Vec<Medication>> = reconciler.load(None).await.unwrap();
        assert_eq!(loaded.tier, Tier::Local);

        let result = reconciler.save(None, &loaded.value).await;
        assert_eq!(result, Err(SyncError::NotAuthenticated));
        assert_eq!(remote.write_count(RecordKind::Medications), 0);
        assert_eq!(local.write_count(RecordKind::Medications), 1);
    }

    #[tokio::test]
    async fn test_custom_seed_for_profile() {
        let local = Arc::new(InMemoryStore::new());
        let remote = Arc::new(InMemoryStore::new());
        let reconciler = Reconciler::new(Arc::clone(&local), Arc::clone(&remote));

        let loaded = reconciler
            .load_or_seed(Some(&session()), || UserProfile {
                name: "Asha".to_string(),
                ..UserProfile::seed()
            })
            .await
            .unwrap();

        assert_eq!(loaded.tier, Tier::Seed);
        assert_eq!(loaded.value.name, "Asha");
        assert_eq!(remote.write_count(RecordKind::UserProfile), 1);
        assert_eq!(local.write_count(RecordKind::UserProfile), 1);

        let again: Loaded<UserProfile> = reconciler.load(Some(&session())).await.unwrap();
        assert_eq!(again.tier, Tier::Remote);
        assert_eq!(again.value.name, "Asha");
    }

    #[tokio::test]
    async fn test_local_cache_is_per_user() {
        let mut remote = MockRemote::new();
        remote.expect_fetch().returning(|_| Ok(None));
        remote.expect_write().returning(|_, _| Ok(()));

        let local = Arc::new(InMemoryStore::new());
        let reconciler = Reconciler::new(Arc::clone(&local), Arc::new(remote));
        let alice = Session::new("alice", "token-a");
        let bob = Session::new("bob", "token-b");

        let mut private = one_medication();
        private[0].name = "Alice private".to_string();
        reconciler.save(Some(&alice), &private).await.unwrap();

        let loaded: Loaded<Vec<Medication>> = reconciler.load(Some(&bob)).await.unwrap();
        assert_eq!(loaded.tier, Tier::Seed);
        assert!(loaded.value.iter().all(|med| med.name != "Alice private"));

        let loaded: Loaded<Vec<Medication>> = reconciler.load(Some(&alice)).await.unwrap();
        assert_eq!(loaded.tier, Tier::Local);
        assert_eq!(loaded.value, private);
    }

    #[tokio::test]
    async fn test_write_lock_is_per_user_and_kind() {
        let reconciler = Reconciler::new(Arc::new(InMemoryStore::new()), Arc::new(InMemoryStore::new()));
        let alice = Session::new("alice", "token-a");
        let bob = Session::new("bob", "token-b");

        let held = reconciler.write_lock::<Vec<Medication>>(Some(&alice)).await.unwrap();

        // Other users and other kinds are not blocked
        let _bob = reconciler.write_lock::<Vec<Medication>>(Some(&bob)).await.unwrap();
        let _profile = reconciler.write_lock::<UserProfile>(Some(&alice)).await.unwrap();

        let clone = reconciler.clone();
        let waiter = tokio::spawn(async move {
            let alice = Session::new("alice", "token-a");
            let _guard = clone.write_lock::<Vec<Medication>>(Some(&alice)).await.unwrap();
        });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(held);
        waiter.await.unwrap();
    }

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(SyncError::from(StoreError::NotAuthenticated), SyncError::NotAuthenticated);
        assert!(matches!(
            SyncError::from(StoreError::LocalIo("disk".to_string())),
            SyncError::LocalIo(_)
        ));
    }
}
