use serde::{Deserialize, Serialize};

/// Someone to call in an emergency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub relationship: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_emergency_service: bool,
}

/// Health insurance details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub provider: String,
    pub policy_number: String,
    pub group_number: String,
}

/// User-facing toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Push notifications enabled
    pub notifications: bool,

    /// Name of the reminder sound
    pub reminder_sound: String,

    /// Share location when SOS is triggered
    pub emergency_location: bool,

    /// Share data with caregivers
    pub data_sharing: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            reminder_sound: "default".to_string(),
            emergency_location: true,
            data_sharing: false,
        }
    }
}

/// Storage model for the user's profile; one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique identifier for the profile
    pub id: String,

    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: String,

    /// Known medical conditions
    #[serde(default)]
    pub medical_conditions: Vec<String>,

    /// Known allergies
    #[serde(default)]
    pub allergies: Vec<String>,

    /// Optional blood type (e.g. B+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,

    /// People and services to contact in an emergency
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,

    /// Optional insurance details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_info: Option<InsuranceInfo>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}
