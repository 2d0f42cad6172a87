use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

use med_alert_data::repository::Session;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// The caller's session, if the request carried one
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    header(headers, "authorization")
        .and_then(|v| v.strip_prefix("Bearer ").map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
}

/// Session from `Authorization: Bearer` and `X-User-Id`, with optional
/// `X-User-Email` and `X-User-Name`. Both required headers must be present.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    let access_token = bearer_token(headers)?;
    let user_id = header(headers, USER_ID_HEADER)?;

    Some(Session {
        email: header(headers, USER_EMAIL_HEADER),
        full_name: header(headers, USER_NAME_HEADER),
        ..Session::new(user_id, access_token)
    })
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentSession(session_from_headers(&parts.headers)))
    }
}
