use serde::{Deserialize, Serialize};

/// Blood pressure pair in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,
}

/// Storage model for a set of vital-sign measurements taken together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    /// Unique identifier for the reading
    pub id: String,

    /// When the reading was taken (RFC 3339)
    pub timestamp: String,

    /// Optional blood pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,

    /// Optional heart rate in beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u16>,

    /// Optional body temperature in °F
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Optional oxygen saturation in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<u16>,

    /// Optional weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Optional blood glucose in mg/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<u16>,

    /// Optional notes about the reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VitalSigns {
    /// Whether at least one measurement field is present
    pub fn has_measurement(&self) -> bool {
        self.blood_pressure.is_some()
            || self.heart_rate.is_some()
            || self.temperature.is_some()
            || self.oxygen_saturation.is_some()
            || self.weight.is_some()
            || self.blood_glucose.is_some()
    }
}
