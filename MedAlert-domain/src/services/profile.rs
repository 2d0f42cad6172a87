use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use med_alert_data::models::UserProfile;
use med_alert_data::repository::{LocalStore, RemoteStore, Session};
use med_alert_data::Seed;

use super::ServiceError;
use crate::sync::{Loaded, Reconciler};

/// Boolean preference switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceKey {
    Notifications,
    EmergencyLocation,
    DataSharing,
}

/// Set one preference switch on a profile
pub fn set_preference(profile: &mut UserProfile, key: PreferenceKey, value: bool) {
    let preferences = &mut profile.preferences;
    match key {
        PreferenceKey::Notifications => preferences.notifications = value,
        PreferenceKey::EmergencyLocation => preferences.emergency_location = value,
        PreferenceKey::DataSharing => preferences.data_sharing = value,
    }
}

fn parse_birth_date(date_of_birth: &str) -> Option<NaiveDate> {
    let date = date_of_birth.get(..10).unwrap_or(date_of_birth);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Age in whole years on `today`; `None` when the birth date does not parse
pub fn age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let birth = parse_birth_date(date_of_birth)?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// The built-in profile, carrying the signed-in user's email and name when known
pub fn personalised_seed(session: Option<&Session>) -> UserProfile {
    let mut profile = UserProfile::seed();
    if let Some(session) = session {
        if let Some(email) = &session.email {
            profile.email = email.clone();
        }
        if let Some(name) = &session.full_name {
            profile.name = name.clone();
        }
    }
    profile
}

/// Profile operations
pub struct ProfileService<L, R> {
    sync: Reconciler<L, R>,
}

impl<L, R> Clone for ProfileService<L, R> {
    fn clone(&self) -> Self {
        Self { sync: self.sync.clone() }
    }
}

impl<L, R> ProfileService<L, R>
where
    L: LocalStore<UserProfile>,
    R: RemoteStore<UserProfile>,
{
    pub fn new(sync: Reconciler<L, R>) -> Self {
        Self { sync }
    }

    pub async fn load(&self, session: Option<&Session>) -> Result<Loaded<UserProfile>, ServiceError> {
        Ok(self.sync.load_or_seed(session, || personalised_seed(session)).await?)
    }

    #[instrument(skip(self, session, profile), fields(id = %profile.id))]
    pub async fn save(&self, session: Option<&Session>, profile: &UserProfile) -> Result<(), ServiceError> {
        self.sync.save(session, profile).await?;
        info!("Saved profile");
        Ok(())
    }

    /// Load, flip one preference and save
    pub async fn update_preference(
        &self,
        session: Option<&Session>,
        key: PreferenceKey,
        value: bool,
    ) -> Result<UserProfile, ServiceError> {
        let _guard = self.sync.write_lock::<UserProfile>(session).await?;
        let mut profile = self.load(session).await?.value;
        set_preference(&mut profile, key, value);
        debug!("Preference {:?} set to {}", key, value);
        self.save(session, &profile).await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Tier;
    use med_alert_data::repository::InMemoryStore;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_on() {
        assert_eq!(age_on("1956-08-15", date(2024, 8, 14)), Some(67));
        assert_eq!(age_on("1956-08-15", date(2024, 8, 15)), Some(68));
        assert_eq!(age_on("1956-08-15T00:00:00Z", date(2024, 12, 1)), Some(68));
        assert_eq!(age_on("not a date", date(2024, 12, 1)), None);
    }

    #[test]
    fn test_set_preference() {
        let mut profile = UserProfile::seed();
        set_preference(&mut profile, PreferenceKey::DataSharing, true);
        set_preference(&mut profile, PreferenceKey::Notifications, false);
        assert!(profile.preferences.data_sharing);
        assert!(!profile.preferences.notifications);
        assert_eq!(profile.preferences.reminder_sound, "default");
    }

    #[tokio::test]
    async fn test_seed_is_personalised() {
        let sync = Reconciler::new(Arc::new(InMemoryStore::new()), Arc::new(InMemoryStore::new()));
        let service = ProfileService::new(sync);
        let session = Session {
            email: Some("asha@example.com".to_string()),
            full_name: Some("Asha Rao".to_string()),
            ..Session::new("user-1", "token")
        };

        let loaded = service.load(Some(&session)).await.unwrap();
        assert_eq!(loaded.tier, Tier::Seed);
        assert_eq!(loaded.value.email, "asha@example.com");
        assert_eq!(loaded.value.name, "Asha Rao");
        assert_eq!(loaded.value.date_of_birth, UserProfile::seed().date_of_birth);

        let updated = service
            .update_preference(Some(&session), PreferenceKey::DataSharing, true)
            .await
            .unwrap();
        assert!(updated.preferences.data_sharing);

        let reloaded = service.load(Some(&session)).await.unwrap();
        assert_eq!(reloaded.tier, Tier::Remote);
        assert!(reloaded.value.preferences.data_sharing);
    }
}
