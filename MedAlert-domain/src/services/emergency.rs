use med_alert_data::models::{EmergencyContact, UserProfile};
use med_alert_data::repository::{LocalStore, RemoteStore, Session};

use super::profile::ProfileService;
use super::ServiceError;

/// National emergency number, always offered first
pub const EMERGENCY_SERVICES_NUMBER: &str = "112";

fn emergency_services() -> EmergencyContact {
    EmergencyContact {
        id: "emergency-services".to_string(),
        name: "Emergency Services".to_string(),
        relationship: "Emergency".to_string(),
        phone: EMERGENCY_SERVICES_NUMBER.to_string(),
        email: None,
        is_primary: true,
        is_emergency_service: true,
    }
}

/// Contacts offered on the SOS screen: emergency services, then primary
/// contacts, then everyone else, each group in profile order.
pub fn sos_contacts(profile: &UserProfile) -> Vec<EmergencyContact> {
    let (primary, others): (Vec<&EmergencyContact>, Vec<&EmergencyContact>) =
        profile.emergency_contacts.iter().partition(|c| c.is_primary);

    std::iter::once(emergency_services())
        .chain(primary.into_iter().cloned())
        .chain(others.into_iter().cloned())
        .collect()
}

pub struct EmergencyService<L, R> {
    profiles: ProfileService<L, R>,
}

impl<L, R> EmergencyService<L, R>
where
    L: LocalStore<UserProfile>,
    R: RemoteStore<UserProfile>,
{
    pub fn new(profiles: ProfileService<L, R>) -> Self {
        Self { profiles }
    }

    pub async fn contacts(&self, session: Option<&Session>) -> Result<Vec<EmergencyContact>, ServiceError> {
        let profile = self.profiles.load(session).await?.value;
        Ok(sos_contacts(&profile))
    }
}
