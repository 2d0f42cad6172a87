use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{Caregiver, Medication, UserProfile, VitalSigns};

/// Record kinds exchanged with both stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Medications,
    VitalSigns,
    Caregivers,
    UserProfile,
}

impl RecordKind {
    /// Tag used as the local storage key
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Medications => "medications",
            RecordKind::VitalSigns => "vital_signs",
            RecordKind::Caregivers => "caregivers",
            RecordKind::UserProfile => "user_profile",
        }
    }

    /// Remote table holding rows of this kind
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::UserProfile => "user_profiles",
            other => other.as_str(),
        }
    }

    /// Whether the kind holds at most one record per user
    pub fn is_singleton(&self) -> bool {
        matches!(self, RecordKind::UserProfile)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record stored as a list entry
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind of the list this record lives in
    const LIST_KIND: RecordKind;
}

impl Record for Medication {
    const LIST_KIND: RecordKind = RecordKind::Medications;
}

impl Record for VitalSigns {
    const LIST_KIND: RecordKind = RecordKind::VitalSigns;
}

impl Record for Caregiver {
    const LIST_KIND: RecordKind = RecordKind::Caregivers;
}

/// The unit a store reads and writes for one record kind: a whole list,
/// or the singleton profile.
pub trait Collection: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Row type as stored remotely
    type Item: Serialize + DeserializeOwned + Send + Sync;

    const KIND: RecordKind;

    /// True when the value counts as "nothing stored"
    fn is_vacant(&self) -> bool;

    /// Rows to upsert remotely
    fn rows(&self) -> Vec<&Self::Item>;

    /// Rebuild from remote rows; `None` when there is nothing to build from
    fn from_rows(rows: Vec<Self::Item>) -> Option<Self>;
}

impl<T: Record> Collection for Vec<T> {
    type Item = T;

    const KIND: RecordKind = T::LIST_KIND;

    fn is_vacant(&self) -> bool {
        self.is_empty()
    }

    fn rows(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn from_rows(rows: Vec<T>) -> Option<Self> {
        Some(rows)
    }
}

impl Collection for UserProfile {
    type Item = UserProfile;

    const KIND: RecordKind = RecordKind::UserProfile;

    fn is_vacant(&self) -> bool {
        false
    }

    fn rows(&self) -> Vec<&UserProfile> {
        vec![self]
    }

    fn from_rows(rows: Vec<UserProfile>) -> Option<Self> {
        rows.into_iter().next()
    }
}
