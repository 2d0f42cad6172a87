//! Store wiring shared by every handler

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use med_alert_data::repository::{
    Collection, InMemoryStore, LocalStore, RemoteStore, RestRemoteStore, Session, SqliteLocalStore,
    StoreError,
};
use med_alert_data::StoreConfig;
use med_alert_domain::services::{
    CaregiverService, EmergencyService, MedicationService, ProfileService, VitalSignsService,
};
use med_alert_domain::sync::Reconciler;

/// Local cache selected at startup
#[derive(Clone)]
pub enum LocalBackend {
    Sqlite(SqliteLocalStore),
    Memory(InMemoryStore),
}

impl LocalBackend {
    pub fn name(&self) -> &'static str {
        match self {
            LocalBackend::Sqlite(_) => "sqlite",
            LocalBackend::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl<C: Collection> LocalStore<C> for LocalBackend {
    async fn fetch(&self, scope: &str) -> Result<Option<C>, StoreError> {
        match self {
            LocalBackend::Sqlite(store) => LocalStore::<C>::fetch(store, scope).await,
            LocalBackend::Memory(store) => LocalStore::<C>::fetch(store, scope).await,
        }
    }

    async fn write(&self, scope: &str, value: &C) -> Result<(), StoreError> {
        match self {
            LocalBackend::Sqlite(store) => LocalStore::<C>::write(store, scope, value).await,
            LocalBackend::Memory(store) => LocalStore::<C>::write(store, scope, value).await,
        }
    }
}

/// Remote store selected at startup
#[derive(Clone)]
pub enum RemoteBackend {
    Rest(RestRemoteStore),
    Memory(InMemoryStore),
}

impl RemoteBackend {
    pub fn name(&self) -> &'static str {
        match self {
            RemoteBackend::Rest(_) => "rest",
            RemoteBackend::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl<C: Collection> RemoteStore<C> for RemoteBackend {
    async fn fetch(&self, session: &Session) -> Result<Option<C>, StoreError> {
        match self {
            RemoteBackend::Rest(store) => RemoteStore::<C>::fetch(store, session).await,
            RemoteBackend::Memory(store) => RemoteStore::<C>::fetch(store, session).await,
        }
    }

    async fn write(&self, session: &Session, value: &C) -> Result<(), StoreError> {
        match self {
            RemoteBackend::Rest(store) => RemoteStore::<C>::write(store, session, value).await,
            RemoteBackend::Memory(store) => RemoteStore::<C>::write(store, session, value).await,
        }
    }
}

/// Services over the configured stores
#[derive(Clone)]
pub struct AppState {
    pub medications: Arc<MedicationService<LocalBackend, RemoteBackend>>,
    pub vitals: Arc<VitalSignsService<LocalBackend, RemoteBackend>>,
    pub caregivers: Arc<CaregiverService<LocalBackend, RemoteBackend>>,
    pub profiles: Arc<ProfileService<LocalBackend, RemoteBackend>>,
    pub emergency: Arc<EmergencyService<LocalBackend, RemoteBackend>>,
    pub local_backend: &'static str,
    pub remote_backend: &'static str,
}

impl AppState {
    pub fn new(local: LocalBackend, remote: RemoteBackend) -> Self {
        let local_backend = local.name();
        let remote_backend = remote.name();
        let sync = Reconciler::new(Arc::new(local), Arc::new(remote));
        let profiles = ProfileService::new(sync.clone());

        Self {
            medications: Arc::new(MedicationService::new(sync.clone())),
            vitals: Arc::new(VitalSignsService::new(sync.clone())),
            caregivers: Arc::new(CaregiverService::new(sync)),
            emergency: Arc::new(EmergencyService::new(profiles.clone())),
            profiles: Arc::new(profiles),
            local_backend,
            remote_backend,
        }
    }

    /// Build the stores described by the configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let local = LocalBackend::Sqlite(SqliteLocalStore::open(&config.database)?);

        let remote = match &config.remote {
            Some(remote) => RemoteBackend::Rest(RestRemoteStore::new(remote.clone())?),
            None => {
                info!("No remote store configured, using in-memory stand-in");
                RemoteBackend::Memory(InMemoryStore::new())
            }
        };

        Ok(Self::new(local, remote))
    }

    /// Both stores in memory
    pub fn in_memory() -> Self {
        Self::new(
            LocalBackend::Memory(InMemoryStore::new()),
            RemoteBackend::Memory(InMemoryStore::new()),
        )
    }
}
