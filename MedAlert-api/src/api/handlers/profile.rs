use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use med_alert_data::models::UserProfile;
use med_alert_domain::services::profile::{age_on, PreferenceKey};
use med_alert_domain::sync::Tier;

use crate::api::error::ErrorResponse;
use crate::api::session::CurrentSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub data: UserProfile,
    pub source: Tier,
    pub age: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceUpdate {
    pub key: PreferenceKey,
    pub value: bool,
}

#[instrument(skip(state, session))]
pub async fn get_profile(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let loaded = state.profiles.load(session.session()).await?;
    Ok(Json(ProfileResponse {
        age: age_on(&loaded.value.date_of_birth, Local::now().date_naive()),
        data: loaded.value,
        source: loaded.tier,
    }))
}

#[instrument(skip(state, session, profile))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(profile): Json<UserProfile>,
) -> Result<impl IntoResponse, ErrorResponse> {
    state.profiles.save(session.session(), &profile).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, session))]
pub async fn update_preference(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(update): Json<PreferenceUpdate>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let profile = state
        .profiles
        .update_preference(session.session(), update.key, update.value)
        .await?;
    Ok(Json(profile))
}
