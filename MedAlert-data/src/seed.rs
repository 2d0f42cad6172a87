//! Built-in placeholder data written to both stores the first time a user
//! has nothing stored anywhere.

use crate::models::{
    BloodPressure, Caregiver, CaregiverRole, EmergencyContact, InsuranceInfo, Medication,
    Permission, Preferences, UserProfile, VitalSigns,
};
use crate::repository::Collection;

/// A collection with a fixed bootstrap value
pub trait Seed: Collection {
    /// The bootstrap value; never vacant
    fn seed() -> Self;
}

#[allow(clippy::too_many_arguments)]
fn medication(
    id: &str,
    name: &str,
    dosage: &str,
    frequency: &str,
    times: &[&str],
    instructions: &str,
    pills_remaining: u32,
    total_doses: u32,
    missed_doses: u32,
) -> Medication {
    let adherence_rate = if total_doses > 0 {
        ((total_doses - missed_doses) as f64 / total_doses as f64 * 100.0).round() as u8
    } else {
        100
    };

    Medication {
        id: id.to_string(),
        name: name.to_string(),
        dosage: dosage.to_string(),
        frequency: frequency.to_string(),
        times: times.iter().map(|t| t.to_string()).collect(),
        start_date: "2024-01-01T00:00:00Z".to_string(),
        end_date: None,
        instructions: instructions.to_string(),
        prescribed_by: "Dr. Rajesh Kumar".to_string(),
        refill_reminder: true,
        pills_remaining,
        total_pills: 60,
        is_active: true,
        adherence_rate,
        last_taken: None,
        missed_doses,
        total_doses,
    }
}

impl Seed for Vec<Medication> {
    fn seed() -> Self {
        vec![
            medication(
                "seed-med-1",
                "Metformin",
                "500mg",
                "Twice daily",
                &["08:00", "20:00"],
                "Take with meals",
                42,
                40,
                2,
            ),
            medication(
                "seed-med-2",
                "Telmisartan",
                "40mg",
                "Once daily",
                &["08:00"],
                "Take in the morning",
                18,
                20,
                1,
            ),
            medication(
                "seed-med-3",
                "Atorvastatin",
                "10mg",
                "Once daily",
                &["22:00"],
                "Take at bedtime",
                4,
                25,
                5,
            ),
        ]
    }
}

impl Seed for Vec<VitalSigns> {
    fn seed() -> Self {
        vec![
            VitalSigns {
                id: "seed-vital-1".to_string(),
                timestamp: "2024-03-03T08:30:00Z".to_string(),
                blood_pressure: Some(BloodPressure { systolic: 128, diastolic: 82 }),
                heart_rate: Some(74),
                temperature: Some(98.4),
                oxygen_saturation: Some(97),
                weight: Some(72.5),
                blood_glucose: Some(112),
                notes: Some("After breakfast".to_string()),
            },
            VitalSigns {
                id: "seed-vital-2".to_string(),
                timestamp: "2024-03-02T08:15:00Z".to_string(),
                blood_pressure: Some(BloodPressure { systolic: 134, diastolic: 86 }),
                heart_rate: Some(78),
                temperature: Some(98.6),
                oxygen_saturation: Some(96),
                weight: Some(72.8),
                blood_glucose: Some(126),
                notes: None,
            },
            VitalSigns {
                id: "seed-vital-3".to_string(),
                timestamp: "2024-03-01T08:05:00Z".to_string(),
                blood_pressure: Some(BloodPressure { systolic: 122, diastolic: 80 }),
                heart_rate: Some(72),
                temperature: None,
                oxygen_saturation: Some(98),
                weight: None,
                blood_glucose: Some(104),
                notes: Some("Fasting".to_string()),
            },
        ]
    }
}

impl Seed for Vec<Caregiver> {
    fn seed() -> Self {
        vec![
            Caregiver {
                id: "seed-caregiver-1".to_string(),
                name: "Priya Sharma".to_string(),
                relationship: "Daughter".to_string(),
                email: "priya.sharma@example.com".to_string(),
                phone: "+91 98765 43210".to_string(),
                role: CaregiverRole::Primary,
                permissions: vec![
                    Permission::ViewMedications,
                    Permission::ViewHealth,
                    Permission::EmergencyContact,
                    Permission::ReceiveAlerts,
                ],
                avatar: None,
                is_active: true,
                last_active: Some("2024-03-03T09:00:00Z".to_string()),
            },
            Caregiver {
                id: "seed-caregiver-2".to_string(),
                name: "Dr. Rajesh Kumar".to_string(),
                relationship: "Family Doctor".to_string(),
                email: "dr.kumar@example.com".to_string(),
                phone: "+91 11234 56789".to_string(),
                role: CaregiverRole::Medical,
                permissions: vec![
                    Permission::ViewMedications,
                    Permission::ViewHealth,
                    Permission::ModifyMedications,
                ],
                avatar: None,
                is_active: true,
                last_active: Some("2024-03-01T17:30:00Z".to_string()),
            },
            Caregiver {
                id: "seed-caregiver-3".to_string(),
                name: "Amit Sharma".to_string(),
                relationship: "Son".to_string(),
                email: "amit.sharma@example.com".to_string(),
                phone: "+91 98765 43211".to_string(),
                role: CaregiverRole::Secondary,
                permissions: vec![Permission::ViewMedications, Permission::EmergencyContact],
                avatar: None,
                is_active: false,
                last_active: None,
            },
        ]
    }
}

impl Seed for UserProfile {
    fn seed() -> Self {
        UserProfile {
            id: "seed-profile".to_string(),
            name: "Ramesh Sharma".to_string(),
            email: "ramesh.sharma@example.com".to_string(),
            phone: "+91 98765 00000".to_string(),
            date_of_birth: "1956-08-15".to_string(),
            medical_conditions: vec!["Type 2 Diabetes".to_string(), "Hypertension".to_string()],
            allergies: vec!["Penicillin".to_string()],
            blood_type: Some("B+".to_string()),
            emergency_contacts: vec![
                EmergencyContact {
                    id: "seed-contact-1".to_string(),
                    name: "Priya Sharma".to_string(),
                    relationship: "Daughter".to_string(),
                    phone: "+91 98765 43210".to_string(),
                    email: Some("priya.sharma@example.com".to_string()),
                    is_primary: true,
                    is_emergency_service: false,
                },
                EmergencyContact {
                    id: "seed-contact-2".to_string(),
                    name: "Dr. Rajesh Kumar".to_string(),
                    relationship: "Family Doctor".to_string(),
                    phone: "+91 11234 56789".to_string(),
                    email: None,
                    is_primary: false,
                    is_emergency_service: false,
                },
            ],
            insurance_info: Some(InsuranceInfo {
                provider: "Star Health".to_string(),
                policy_number: "SH-000000".to_string(),
                group_number: "G-100".to_string(),
            }),
            preferences: Preferences::default(),
        }
    }
}
