use serde::{Deserialize, Serialize};

/// Storage model for a tracked medication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Unique identifier for the medication
    pub id: String,

    /// Medication name (e.g. Metformin)
    pub name: String,

    /// Dosage label (e.g. 500mg)
    pub dosage: String,

    /// Frequency label (e.g. Twice daily)
    pub frequency: String,

    /// Scheduled times of day as HH:MM strings, in schedule order
    #[serde(default)]
    pub times: Vec<String>,

    /// When the course started
    pub start_date: String,

    /// Optional end of the course
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Free-text instructions
    #[serde(default)]
    pub instructions: String,

    /// Name of the prescriber
    #[serde(default)]
    pub prescribed_by: String,

    /// Whether a refill reminder is wanted
    #[serde(default)]
    pub refill_reminder: bool,

    /// Pills left in the current pack
    pub pills_remaining: u32,

    /// Pack size
    pub total_pills: u32,

    /// Whether the medication is currently being taken
    pub is_active: bool,

    /// Percentage of doses taken, 0-100
    pub adherence_rate: u8,

    /// When the last dose was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_taken: Option<String>,

    /// Doses missed so far
    #[serde(default)]
    pub missed_doses: u32,

    /// Doses recorded so far
    #[serde(default)]
    pub total_doses: u32,
}
