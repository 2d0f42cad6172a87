// MedAlert API lib.rs
//
// HTTP surface over the medication, vitals, caregiver and profile services.

pub mod api;
pub mod state;
