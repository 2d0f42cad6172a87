use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use med_alert_data::models::{Caregiver, CaregiverRole, Permission};
use med_alert_data::repository::{LocalStore, RemoteStore, Session};

use super::{first_validation_message, validate_not_blank, ServiceError};
use crate::sync::{Loaded, Reconciler};

/// Permissions granted when a role is selected
pub fn role_defaults(role: CaregiverRole) -> Vec<Permission> {
    match role {
        CaregiverRole::Primary => vec![
            Permission::ViewMedications,
            Permission::ViewHealth,
            Permission::EmergencyContact,
            Permission::ReceiveAlerts,
        ],
        CaregiverRole::Medical => vec![
            Permission::ViewMedications,
            Permission::ViewHealth,
            Permission::ModifyMedications,
        ],
        CaregiverRole::Secondary => vec![Permission::ViewMedications, Permission::EmergencyContact],
    }
}

/// Role and permission choice while a caregiver is being set up.
///
/// Selecting a role replaces the permissions with that role's defaults;
/// toggles afterwards override them one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDraft {
    role: CaregiverRole,
    permissions: Vec<Permission>,
}

impl Default for PermissionDraft {
    fn default() -> Self {
        Self {
            role: CaregiverRole::Secondary,
            permissions: Vec::new(),
        }
    }
}

impl PermissionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_role(&mut self, role: CaregiverRole) {
        self.role = role;
        self.permissions = role_defaults(role);
    }

    pub fn toggle(&mut self, permission: Permission) {
        match self.permissions.iter().position(|p| *p == permission) {
            Some(index) => {
                self.permissions.remove(index);
            }
            None => self.permissions.push(permission),
        }
    }

    pub fn role(&self) -> CaregiverRole {
        self.role
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Request to add a caregiver
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCaregiver {
    #[validate(custom(function = "validate_not_blank", message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank", message = "Relationship is required"))]
    pub relationship: String,

    #[validate(custom(function = "validate_not_blank", message = "Phone number is required"))]
    pub phone: String,

    #[validate(custom(function = "validate_not_blank", message = "Email is required"))]
    pub email: String,

    pub role: CaregiverRole,

    /// Explicit permissions; the role defaults when absent
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,

    #[serde(default)]
    pub avatar: Option<String>,
}

/// `local@domain.tld`: no whitespace, a single `@`, and a dot inside the domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Format a number in the Indian `+91 XXXXX XXXXX` style where the digit count allows
pub fn format_phone_number(phone: &str) -> String {
    let digits = digits(phone);

    if digits.len() <= 10 {
        if digits.len() > 5 {
            return format!("+91 {} {}", &digits[..5], &digits[5..]);
        }
        return format!("+91 {}", digits);
    }

    if digits.len() == 12 && digits.starts_with("91") {
        return format!("+91 {} {}", &digits[2..7], &digits[7..]);
    }

    phone.to_string()
}

impl NewCaregiver {
    /// Validate in form order and build the stored record
    pub fn into_caregiver(self, now: DateTime<Utc>) -> Result<Caregiver, ServiceError> {
        if let Err(errors) = self.validate() {
            return Err(ServiceError::Validation(first_validation_message(
                &errors,
                &["name", "relationship", "phone", "email"],
            )));
        }

        if !is_valid_email(&self.email) {
            return Err(ServiceError::Validation("Please enter a valid email address".to_string()));
        }

        if digits(&self.phone).len() < 10 {
            return Err(ServiceError::Validation("Please enter a valid phone number".to_string()));
        }

        let permissions = self.permissions.unwrap_or_else(|| role_defaults(self.role));

        Ok(Caregiver {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            relationship: self.relationship.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: format_phone_number(self.phone.trim()),
            role: self.role,
            permissions,
            avatar: self.avatar,
            is_active: true,
            last_active: Some(now.to_rfc3339()),
        })
    }
}

pub fn active_count(caregivers: &[Caregiver]) -> usize {
    caregivers.iter().filter(|c| c.is_active).count()
}

pub fn with_role(caregivers: &[Caregiver], role: CaregiverRole) -> Vec<&Caregiver> {
    caregivers.iter().filter(|c| c.role == role).collect()
}

/// Caregivers split by role, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverGroups {
    pub active_count: usize,
    pub primary: Vec<Caregiver>,
    pub medical: Vec<Caregiver>,
    pub secondary: Vec<Caregiver>,
}

impl CaregiverGroups {
    pub fn build(caregivers: &[Caregiver]) -> Self {
        let owned = |role: CaregiverRole| -> Vec<Caregiver> {
            with_role(caregivers, role).into_iter().cloned().collect()
        };
        Self {
            active_count: active_count(caregivers),
            primary: owned(CaregiverRole::Primary),
            medical: owned(CaregiverRole::Medical),
            secondary: owned(CaregiverRole::Secondary),
        }
    }
}

/// Caregiver list operations
pub struct CaregiverService<L, R> {
    sync: Reconciler<L, R>,
}

impl<L, R> CaregiverService<L, R>
where
    L: LocalStore<Vec<Caregiver>>,
    R: RemoteStore<Vec<Caregiver>>,
{
    pub fn new(sync: Reconciler<L, R>) -> Self {
        Self { sync }
    }

    pub async fn load(&self, session: Option<&Session>) -> Result<Loaded<Vec<Caregiver>>, ServiceError> {
        Ok(self.sync.load(session).await?)
    }

    #[instrument(skip(self, session, request), fields(role = ?request.role))]
    pub async fn add(&self, session: Option<&Session>, request: NewCaregiver) -> Result<Caregiver, ServiceError> {
        let caregiver = request.into_caregiver(Utc::now())?;

        let _guard = self.sync.write_lock::<Vec<Caregiver>>(session).await?;
        let mut caregivers = self.load(session).await?.value;
        caregivers.push(caregiver.clone());
        self.sync.save(session, &caregivers).await?;

        info!("Added caregiver {}", caregiver.id);
        Ok(caregiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use med_alert_data::repository::InMemoryStore;
    use std::sync::Arc;

    fn request() -> NewCaregiver {
        NewCaregiver {
            name: "Priya".to_string(),
            relationship: "Daughter".to_string(),
            phone: "98765 43210".to_string(),
            email: "Priya@Example.com".to_string(),
            role: CaregiverRole::Medical,
            permissions: None,
            avatar: None,
        }
    }

    fn rejection(request: NewCaregiver) -> String {
        match request.into_caregiver(Utc::now()) {
            Err(ServiceError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_medical_role_defaults() {
        let caregiver = request().into_caregiver(Utc::now()).unwrap();
        assert_eq!(
            caregiver.permissions,
            vec![Permission::ViewMedications, Permission::ViewHealth, Permission::ModifyMedications]
        );
        assert_eq!(caregiver.email, "priya@example.com");
        assert_eq!(caregiver.phone, "+91 98765 43210");
        assert!(caregiver.is_active);
        assert!(caregiver.last_active.is_some());
    }

    #[test]
    fn test_validation_order() {
        let blank = NewCaregiver {
            name: " ".to_string(),
            relationship: String::new(),
            phone: String::new(),
            email: String::new(),
            ..request()
        };
        assert_eq!(rejection(blank.clone()), "Name is required");

        let no_email = NewCaregiver {
            name: "Priya".to_string(),
            relationship: "Daughter".to_string(),
            phone: "123".to_string(),
            ..blank
        };
        assert_eq!(rejection(no_email), "Email is required");

        let bad_email = NewCaregiver {
            email: "priya@example".to_string(),
            phone: "123".to_string(),
            ..request()
        };
        assert_eq!(rejection(bad_email), "Please enter a valid email address");

        let short_phone = NewCaregiver {
            phone: "98765-4321".to_string(),
            ..request()
        };
        assert_eq!(rejection(short_phone.clone()), "Please enter a valid phone number");
        let short_phone = NewCaregiver {
            phone: "987654321".to_string(),
            ..short_phone
        };
        assert_eq!(rejection(short_phone), "Please enter a valid phone number");
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@.b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b@c.de"));
        assert!(!is_valid_email(" a@b.co"));
    }

    #[test]
    fn test_format_phone_number() {
        assert_eq!(format_phone_number("12345"), "+91 12345");
        assert_eq!(format_phone_number("9876543210"), "+91 98765 43210");
        assert_eq!(format_phone_number("919876543210"), "+91 98765 43210");
        assert_eq!(format_phone_number("+91 98765 43210"), "+91 98765 43210");
        assert_eq!(format_phone_number("+1 415 555 01234"), "+1 415 555 01234");
    }

    #[test]
    fn test_permission_draft() {
        let mut draft = PermissionDraft::new();
        assert_eq!(draft.role(), CaregiverRole::Secondary);
        assert!(draft.permissions().is_empty());

        draft.select_role(CaregiverRole::Primary);
        assert_eq!(draft.permissions().len(), 4);

        draft.toggle(Permission::ReceiveAlerts);
        draft.toggle(Permission::ModifyMedications);
        assert!(!draft.permissions().contains(&Permission::ReceiveAlerts));
        assert!(draft.permissions().contains(&Permission::ModifyMedications));

        draft.select_role(CaregiverRole::Secondary);
        assert_eq!(draft.permissions(), role_defaults(CaregiverRole::Secondary).as_slice());
    }

    #[tokio::test]
    async fn test_add_and_group() {
        let sync = Reconciler::new(Arc::new(InMemoryStore::new()), Arc::new(InMemoryStore::new()));
        let service = CaregiverService::new(sync);
        let session = Session::new("user-1", "token");

        service.add(Some(&session), request()).await.unwrap();

        let caregivers = service.load(Some(&session)).await.unwrap().value;
        let groups = CaregiverGroups::build(&caregivers);
        assert_eq!(groups.medical.len(), 2);
        assert_eq!(groups.primary.len(), 1);
        assert_eq!(groups.active_count, 3);
    }
}
