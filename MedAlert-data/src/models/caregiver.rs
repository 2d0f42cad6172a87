use serde::{Deserialize, Serialize};

/// Role a caregiver plays for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaregiverRole {
    /// Day-to-day carer, usually family
    Primary,
    /// Backup carer
    Secondary,
    /// Doctor, nurse or pharmacist
    Medical,
}

/// Access a caregiver has been granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewMedications,
    ViewHealth,
    ModifyMedications,
    EmergencyContact,
    ReceiveAlerts,
}

/// Storage model for a caregiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caregiver {
    /// Unique identifier for the caregiver
    pub id: String,

    /// Display name
    pub name: String,

    /// Relationship to the user (e.g. Daughter)
    pub relationship: String,

    /// Contact email, stored lower-cased
    pub email: String,

    /// Contact phone number
    pub phone: String,

    /// Caregiver role
    pub role: CaregiverRole,

    /// Granted permissions
    #[serde(default)]
    pub permissions: Vec<Permission>,

    /// Optional avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Whether the caregiver is active
    pub is_active: bool,

    /// When the caregiver was last active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<String>,
}
