// MedAlert Domain
// Vital-status rules, the local/remote reconciliation policy and the record services

// Services that implement business logic
pub mod services;

// Store reconciliation
pub mod sync;

// Re-export the data crate for convenience
pub use med_alert_data as data;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
