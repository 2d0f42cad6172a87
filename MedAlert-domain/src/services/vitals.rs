use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use med_alert_data::models::{BloodPressure, VitalSigns};
use med_alert_data::repository::{LocalStore, RemoteStore, Session};

use super::insights::{summarize, HealthSummary};
use super::ServiceError;
use crate::sync::{Loaded, Reconciler};

/// A reading as entered; zero or missing values count as not measured
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVitalSigns {
    #[serde(default)]
    pub systolic: Option<u16>,
    #[serde(default)]
    pub diastolic: Option<u16>,
    #[serde(default)]
    pub heart_rate: Option<u16>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub oxygen_saturation: Option<u16>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub blood_glucose: Option<u16>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn present(value: Option<u16>) -> Option<u16> {
    value.filter(|v| *v != 0)
}

fn present_f64(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

impl NewVitalSigns {
    /// Build the stored reading, rejecting one with no measurement.
    ///
    /// Blood pressure is kept only when both halves are present.
    pub fn into_vital_signs(self, now: DateTime<Utc>) -> Result<VitalSigns, ServiceError> {
        let blood_pressure = match (present(self.systolic), present(self.diastolic)) {
            (Some(systolic), Some(diastolic)) => Some(BloodPressure { systolic, diastolic }),
            _ => None,
        };

        let record = VitalSigns {
            id: Uuid::new_v4().to_string(),
            timestamp: now.to_rfc3339(),
            blood_pressure,
            heart_rate: present(self.heart_rate),
            temperature: present_f64(self.temperature),
            oxygen_saturation: present(self.oxygen_saturation),
            weight: present_f64(self.weight),
            blood_glucose: present(self.blood_glucose),
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        if !record.has_measurement() {
            return Err(ServiceError::Validation(
                "Please enter at least one vital sign measurement".to_string(),
            ));
        }

        Ok(record)
    }
}

fn newest_first(a: &VitalSigns, b: &VitalSigns) -> Ordering {
    match (
        DateTime::parse_from_rfc3339(&a.timestamp),
        DateTime::parse_from_rfc3339(&b.timestamp),
    ) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        _ => b.timestamp.cmp(&a.timestamp),
    }
}

/// Sort readings most recent first; ties keep their order
pub fn sort_newest_first(records: &mut [VitalSigns]) {
    records.sort_by(newest_first);
}

/// Vital-sign history operations
pub struct VitalSignsService<L, R> {
    sync: Reconciler<L, R>,
}

impl<L, R> VitalSignsService<L, R>
where
    L: LocalStore<Vec<VitalSigns>>,
    R: RemoteStore<Vec<VitalSigns>>,
{
    pub fn new(sync: Reconciler<L, R>) -> Self {
        Self { sync }
    }

    /// Load the history, most recent first
    pub async fn load(&self, session: Option<&Session>) -> Result<Loaded<Vec<VitalSigns>>, ServiceError> {
        let mut loaded = self.sync.load(session).await?;
        sort_newest_first(&mut loaded.value);
        Ok(loaded)
    }

    /// Record a new reading at the head of the history
    #[instrument(skip(self, session, request))]
    pub async fn record(&self, session: Option<&Session>, request: NewVitalSigns) -> Result<VitalSigns, ServiceError> {
        let record = request.into_vital_signs(Utc::now())?;

        let _guard = self.sync.write_lock::<Vec<VitalSigns>>(session).await?;
        let mut history = self.load(session).await?.value;
        history.insert(0, record.clone());
        sort_newest_first(&mut history);
        self.sync.save(session, &history).await?;

        info!("Recorded vital signs {}", record.id);
        Ok(record)
    }

    pub async fn summary(&self, session: Option<&Session>) -> Result<HealthSummary, ServiceError> {
        let history = self.load(session).await?.value;
        Ok(summarize(&history))
    }
}
