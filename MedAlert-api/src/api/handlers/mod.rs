pub mod caregivers;
pub mod emergency;
pub mod health;
pub mod medications;
pub mod profile;
pub mod vitals;

use serde::Serialize;

use med_alert_domain::sync::{Loaded, Tier};

/// A loaded collection together with the store that supplied it
#[derive(Debug, Serialize)]
pub struct LoadedResponse<T> {
    pub data: T,
    pub source: Tier,
}

impl<T> From<Loaded<T>> for LoadedResponse<T> {
    fn from(loaded: Loaded<T>) -> Self {
        Self {
            data: loaded.value,
            source: loaded.tier,
        }
    }
}
