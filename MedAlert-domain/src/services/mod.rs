// Domain services
// Record services built on the reconciliation policy, plus the pure vital-status rules.

pub mod caregiver;
pub mod emergency;
pub mod insights;
pub mod medication;
pub mod profile;
pub mod vitals;

use thiserror::Error;
use validator::ValidationErrors;

use crate::sync::SyncError;

pub use caregiver::{CaregiverService, NewCaregiver, PermissionDraft};
pub use emergency::EmergencyService;
pub use medication::{MedicationOverview, MedicationService, NewMedication};
pub use profile::ProfileService;
pub use vitals::{NewVitalSigns, VitalSignsService};

/// Record service errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// Input rejected before any store interaction
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store reconciliation failed
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Message of the first failing field, checked in `order`
pub(crate) fn first_validation_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    order
        .iter()
        .find_map(|field| field_errors.get(field).and_then(|errs| errs.first()).map(|err| (field, err)))
        .map(|(field, err)| match &err.message {
            Some(msg) => msg.to_string(),
            None => format!("Invalid {}", field),
        })
        .unwrap_or_else(|| errors.to_string())
}

/// Rejects empty or whitespace-only text
pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
