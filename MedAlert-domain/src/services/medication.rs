use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use med_alert_data::models::Medication;
use med_alert_data::repository::{LocalStore, RemoteStore, Session};

use super::{first_validation_message, validate_not_blank, ServiceError};
use crate::sync::{Loaded, Reconciler};

/// Pack size assumed when none is given
pub const DEFAULT_TOTAL_PILLS: u32 = 30;

/// Pills remaining at or below which a medication counts as low on stock
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// How far ahead a dose counts as upcoming
pub const UPCOMING_WINDOW_MINUTES: i64 = 120;

/// Request to start tracking a medication
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMedication {
    #[validate(custom(function = "validate_not_blank", message = "Medication name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank", message = "Dosage is required"))]
    pub dosage: String,

    #[serde(default)]
    pub frequency: String,

    /// Explicit schedule; derived from the frequency label when absent
    #[serde(default)]
    pub times: Option<Vec<String>>,

    #[serde(default)]
    pub instructions: String,

    #[serde(default)]
    pub prescribed_by: String,

    #[serde(default)]
    pub total_pills: Option<u32>,

    #[serde(default)]
    pub refill_reminder: bool,

    #[serde(default)]
    pub end_date: Option<String>,
}

/// Default schedule for a frequency label
pub fn default_times(frequency: &str) -> Vec<String> {
    let times: &[&str] = match frequency {
        "Once daily" => &["08:00"],
        "Twice daily" => &["08:00", "20:00"],
        "Three times daily" => &["08:00", "14:00", "20:00"],
        "Four times daily" => &["06:00", "12:00", "18:00", "22:00"],
        _ => &[],
    };
    times.iter().map(|t| t.to_string()).collect()
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M").ok()
}

impl NewMedication {
    /// Validate and build the stored record
    pub fn into_medication(self, now: DateTime<Utc>) -> Result<Medication, ServiceError> {
        if let Err(errors) = self.validate() {
            return Err(ServiceError::Validation(first_validation_message(&errors, &["name", "dosage"])));
        }

        let times = self.times.unwrap_or_else(|| default_times(&self.frequency));
        if let Some(bad) = times.iter().find(|t| parse_time(t).is_none()) {
            return Err(ServiceError::Validation(format!("Invalid time: {}", bad)));
        }

        let total_pills = self.total_pills.filter(|n| *n > 0).unwrap_or(DEFAULT_TOTAL_PILLS);

        Ok(Medication {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            dosage: self.dosage.trim().to_string(),
            frequency: self.frequency,
            times,
            start_date: now.to_rfc3339(),
            end_date: self.end_date,
            instructions: self.instructions.trim().to_string(),
            prescribed_by: self.prescribed_by.trim().to_string(),
            refill_reminder: self.refill_reminder,
            pills_remaining: total_pills,
            total_pills,
            is_active: true,
            adherence_rate: 100,
            last_taken: None,
            missed_doses: 0,
            total_doses: 0,
        })
    }
}

/// Percentage of recorded doses that were not missed
pub fn adherence_rate(total_doses: u32, missed_doses: u32) -> u8 {
    if total_doses == 0 {
        return 100;
    }
    let taken = total_doses.saturating_sub(missed_doses);
    (taken as f64 / total_doses as f64 * 100.0).round() as u8
}

/// Apply a take event to a medication
pub fn record_dose(medication: &mut Medication, now: DateTime<Utc>) {
    medication.total_doses += 1;
    medication.adherence_rate = adherence_rate(medication.total_doses, medication.missed_doses);
    medication.pills_remaining = medication.pills_remaining.saturating_sub(1);
    medication.last_taken = Some(now.to_rfc3339());
}

fn minutes_of_day(time: NaiveTime) -> i64 {
    use chrono::Timelike;
    (time.hour() * 60 + time.minute()) as i64
}

/// Medications with a dose scheduled between `now` and the end of the window, same day
pub fn upcoming<'a>(medications: &'a [Medication], now: NaiveDateTime) -> Vec<&'a Medication> {
    let current = minutes_of_day(now.time());
    let horizon = current + UPCOMING_WINDOW_MINUTES;

    medications
        .iter()
        .filter(|med| {
            med.times
                .iter()
                .filter_map(|t| parse_time(t))
                .map(minutes_of_day)
                .any(|minutes| minutes >= current && minutes <= horizon)
        })
        .collect()
}

fn taken_on_day(medication: &Medication, now: NaiveDateTime) -> bool {
    medication
        .last_taken
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Local).date_naive() == now.date())
        .unwrap_or(false)
}

/// Medications taken today over scheduled slots, as a percentage
pub fn todays_adherence(medications: &[Medication], now: NaiveDateTime) -> u32 {
    let slots: usize = medications.iter().map(|med| med.times.len()).sum();
    if slots == 0 {
        return 100;
    }
    let taken = medications.iter().filter(|med| taken_on_day(med, now)).count();
    (taken as f64 / slots as f64 * 100.0).round() as u32
}

/// Doses taken over a week of scheduled slots, as a percentage. Not capped at 100.
pub fn weekly_adherence(medications: &[Medication]) -> u32 {
    let slots: u32 = medications.iter().map(|med| med.times.len() as u32 * 7).sum();
    if slots == 0 {
        return 100;
    }
    let taken: u32 = medications
        .iter()
        .map(|med| med.total_doses.saturating_sub(med.missed_doses))
        .sum();
    (taken as f64 / slots as f64 * 100.0).round() as u32
}

pub fn low_stock(medications: &[Medication]) -> Vec<&Medication> {
    medications
        .iter()
        .filter(|med| med.pills_remaining <= LOW_STOCK_THRESHOLD)
        .collect()
}

/// First scheduled time later than `now`, else the first time of the schedule
pub fn next_dose(medication: &Medication, now: NaiveDateTime) -> Option<String> {
    let current = now.time();
    medication
        .times
        .iter()
        .find(|t| parse_time(t).map(|time| time > current).unwrap_or(false))
        .or_else(|| medication.times.first())
        .cloned()
}

/// A medication due soon, with the time of its next dose
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDose {
    pub medication: Medication,
    pub next_dose: Option<String>,
}

/// Dashboard figures over the medication list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationOverview {
    pub todays_adherence: u32,
    pub weekly_adherence: u32,
    pub upcoming: Vec<UpcomingDose>,
    pub low_stock: Vec<Medication>,
    pub active_count: usize,
}

impl MedicationOverview {
    pub fn build(medications: &[Medication], now: NaiveDateTime) -> Self {
        Self {
            todays_adherence: todays_adherence(medications, now),
            weekly_adherence: weekly_adherence(medications),
            upcoming: upcoming(medications, now)
                .into_iter()
                .map(|med| UpcomingDose {
                    next_dose: next_dose(med, now),
                    medication: med.clone(),
                })
                .collect(),
            low_stock: low_stock(medications).into_iter().cloned().collect(),
            active_count: medications.iter().filter(|med| med.is_active).count(),
        }
    }
}

/// Medication list operations
pub struct MedicationService<L, R> {
    sync: Reconciler<L, R>,
}

impl<L, R> MedicationService<L, R>
where
    L: LocalStore<Vec<Medication>>,
    R: RemoteStore<Vec<Medication>>,
{
    pub fn new(sync: Reconciler<L, R>) -> Self {
        Self { sync }
    }

    pub async fn load(&self, session: Option<&Session>) -> Result<Loaded<Vec<Medication>>, ServiceError> {
        Ok(self.sync.load(session).await?)
    }

    /// Validate, append and persist a new medication
    #[instrument(skip(self, session, request), fields(name = %request.name))]
    pub async fn add(&self, session: Option<&Session>, request: NewMedication) -> Result<Medication, ServiceError> {
        let medication = request.into_medication(Utc::now())?;

        let _guard = self.sync.write_lock::<Vec<Medication>>(session).await?;
        let mut medications = self.load(session).await?.value;
        medications.push(medication.clone());
        self.sync.save(session, &medications).await?;

        info!("Added medication {}", medication.id);
        Ok(medication)
    }

    /// Record a dose of the medication with `id`
    #[instrument(skip(self, session))]
    pub async fn take(&self, session: Option<&Session>, id: &str) -> Result<Medication, ServiceError> {
        let _guard = self.sync.write_lock::<Vec<Medication>>(session).await?;
        let mut medications = self.load(session).await?.value;

        let medication = medications
            .iter_mut()
            .find(|med| med.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Medication with ID {} not found", id)))?;
        record_dose(medication, Utc::now());
        let taken = medication.clone();

        self.sync.save(session, &medications).await?;

        info!("Recorded dose of {}: {} pills left", taken.name, taken.pills_remaining);
        Ok(taken)
    }

    pub async fn overview(&self, session: Option<&Session>, now: NaiveDateTime) -> Result<MedicationOverview, ServiceError> {
        let medications = self.load(session).await?.value;
        Ok(MedicationOverview::build(&medications, now))
    }
}
