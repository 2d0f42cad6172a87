//! Vital-status rules: per-kind classification, trends, the aggregate
//! health score and critical alerts.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use med_alert_data::models::VitalSigns;

/// A measurable vital-sign kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VitalKind {
    Systolic,
    Diastolic,
    HeartRate,
    Temperature,
    OxygenSaturation,
    BloodGlucose,
    Weight,
    #[serde(other)]
    Unknown,
}

impl VitalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalKind::Systolic => "systolic",
            VitalKind::Diastolic => "diastolic",
            VitalKind::HeartRate => "heartRate",
            VitalKind::Temperature => "temperature",
            VitalKind::OxygenSaturation => "oxygenSaturation",
            VitalKind::BloodGlucose => "bloodGlucose",
            VitalKind::Weight => "weight",
            VitalKind::Unknown => "unknown",
        }
    }
}

impl FromStr for VitalKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "systolic" => VitalKind::Systolic,
            "diastolic" => VitalKind::Diastolic,
            "heartRate" => VitalKind::HeartRate,
            "temperature" => VitalKind::Temperature,
            "oxygenSaturation" => VitalKind::OxygenSaturation,
            "bloodGlucose" => VitalKind::BloodGlucose,
            "weight" => VitalKind::Weight,
            _ => VitalKind::Unknown,
        })
    }
}

impl fmt::Display for VitalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    Normal,
    Warning,
    Critical,
}

/// Direction of change between the two most recent readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Outer critical band and inner warning band for a kind
struct Limits {
    critical_low: f64,
    critical_high: f64,
    warning_low: f64,
    warning_high: f64,
}

const fn limits(critical_low: f64, critical_high: f64, warning_low: f64, warning_high: f64) -> Limits {
    Limits {
        critical_low,
        critical_high,
        warning_low,
        warning_high,
    }
}

fn limits_for(kind: VitalKind) -> Option<Limits> {
    match kind {
        VitalKind::Systolic => Some(limits(90.0, 140.0, 100.0, 130.0)),
        VitalKind::Diastolic => Some(limits(60.0, 90.0, 70.0, 85.0)),
        VitalKind::HeartRate => Some(limits(50.0, 100.0, 60.0, 90.0)),
        VitalKind::Temperature => Some(limits(95.0, 101.0, 97.0, 99.5)),
        VitalKind::OxygenSaturation => Some(limits(90.0, f64::INFINITY, 95.0, f64::INFINITY)),
        VitalKind::BloodGlucose => Some(limits(70.0, 180.0, 80.0, 140.0)),
        VitalKind::Weight | VitalKind::Unknown => None,
    }
}

/// Classify one measurement. Bounds are strict: a value equal to a limit
/// stays in the inner band.
pub fn classify_vital(kind: VitalKind, value: f64) -> VitalStatus {
    let Some(limits) = limits_for(kind) else {
        return VitalStatus::Normal;
    };

    if value < limits.critical_low || value > limits.critical_high {
        VitalStatus::Critical
    } else if value < limits.warning_low || value > limits.warning_high {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}

/// Value of one kind in a reading, if it was measured
pub fn measurement(record: &VitalSigns, kind: VitalKind) -> Option<f64> {
    match kind {
        VitalKind::Systolic => record.blood_pressure.map(|bp| bp.systolic as f64),
        VitalKind::Diastolic => record.blood_pressure.map(|bp| bp.diastolic as f64),
        VitalKind::HeartRate => record.heart_rate.map(f64::from),
        VitalKind::Temperature => record.temperature,
        VitalKind::OxygenSaturation => record.oxygen_saturation.map(f64::from),
        VitalKind::BloodGlucose => record.blood_glucose.map(f64::from),
        VitalKind::Weight => record.weight,
        VitalKind::Unknown => None,
    }
}

/// Compare the two most recent readings of a kind. `history` is newest first.
pub fn compute_trend(history: &[VitalSigns], kind: VitalKind) -> Trend {
    let (Some(latest), Some(previous)) = (history.first(), history.get(1)) else {
        return Trend::Stable;
    };

    match (measurement(latest, kind), measurement(previous, kind)) {
        (Some(current), Some(before)) if current > before => Trend::Up,
        (Some(current), Some(before)) if current < before => Trend::Down,
        _ => Trend::Stable,
    }
}

// Oxygen saturation and weight do not contribute to the score.
const SCORED_KINDS: [VitalKind; 5] = [
    VitalKind::Systolic,
    VitalKind::Diastolic,
    VitalKind::HeartRate,
    VitalKind::Temperature,
    VitalKind::BloodGlucose,
];

fn points(status: VitalStatus) -> u32 {
    match status {
        VitalStatus::Normal => 25,
        VitalStatus::Warning => 15,
        VitalStatus::Critical => 5,
    }
}

/// Aggregate score in 0..=100 for the latest reading; 0 when nothing scorable was measured
pub fn compute_health_score(latest: &VitalSigns) -> u8 {
    let (total, checks) = SCORED_KINDS
        .iter()
        .filter_map(|kind| measurement(latest, *kind).map(|value| classify_vital(*kind, value)))
        .fold((0u32, 0u32), |(total, checks), status| (total + points(status), checks + 1));

    if checks == 0 {
        return 0;
    }

    (total as f64 / (25 * checks) as f64 * 100.0).round() as u8
}

const ALERTS: [(VitalKind, &str); 6] = [
    (VitalKind::Systolic, "High systolic blood pressure detected"),
    (VitalKind::Diastolic, "High diastolic blood pressure detected"),
    (VitalKind::HeartRate, "Abnormal heart rate detected"),
    (VitalKind::Temperature, "Abnormal temperature detected"),
    (VitalKind::OxygenSaturation, "Low oxygen saturation detected"),
    (VitalKind::BloodGlucose, "Abnormal blood sugar level detected"),
];

/// One fixed message per critical measurement, in display order
pub fn collect_critical_alerts(latest: &VitalSigns) -> Vec<String> {
    ALERTS
        .iter()
        .filter(|(kind, _)| {
            measurement(latest, *kind)
                .map(|value| classify_vital(*kind, value) == VitalStatus::Critical)
                .unwrap_or(false)
        })
        .map(|(_, message)| message.to_string())
        .collect()
}

const TRENDED_KINDS: [VitalKind; 5] = [
    VitalKind::Systolic,
    VitalKind::HeartRate,
    VitalKind::Temperature,
    VitalKind::OxygenSaturation,
    VitalKind::BloodGlucose,
];

/// Dashboard view over a reading history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub latest: Option<VitalSigns>,
    pub health_score: u8,
    pub critical_alerts: Vec<String>,
    pub statuses: BTreeMap<VitalKind, VitalStatus>,
    pub trends: BTreeMap<VitalKind, Trend>,
}

/// Summarize a newest-first history
pub fn summarize(history: &[VitalSigns]) -> HealthSummary {
    let Some(latest) = history.first() else {
        return HealthSummary {
            latest: None,
            health_score: 0,
            critical_alerts: Vec::new(),
            statuses: BTreeMap::new(),
            trends: BTreeMap::new(),
        };
    };

    let statuses = ALERTS
        .iter()
        .filter_map(|(kind, _)| measurement(latest, *kind).map(|value| (*kind, classify_vital(*kind, value))))
        .collect();

    let trends = TRENDED_KINDS
        .iter()
        .map(|kind| (*kind, compute_trend(history, *kind)))
        .collect();

    HealthSummary {
        latest: Some(latest.clone()),
        health_score: compute_health_score(latest),
        critical_alerts: collect_critical_alerts(latest),
        statuses,
        trends,
    }
}
