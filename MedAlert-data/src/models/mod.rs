// Storage models, serialized in the camelCase shape both stores persist
pub mod caregiver;
pub mod medication;
pub mod user_profile;
pub mod vital_signs;

pub use caregiver::{Caregiver, CaregiverRole, Permission};
pub use medication::Medication;
pub use user_profile::{EmergencyContact, InsuranceInfo, Preferences, UserProfile};
pub use vital_signs::{BloodPressure, VitalSigns};
