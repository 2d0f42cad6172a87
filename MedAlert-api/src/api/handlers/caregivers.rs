use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{info, instrument};

use med_alert_data::models::Caregiver;
use med_alert_domain::services::caregiver::CaregiverGroups;
use med_alert_domain::services::NewCaregiver;
use med_alert_domain::sync::Tier;

use crate::api::error::ErrorResponse;
use crate::api::session::CurrentSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CaregiversResponse {
    pub data: Vec<Caregiver>,
    pub source: Tier,
    pub groups: CaregiverGroups,
}

#[instrument(skip(state, session))]
pub async fn list_caregivers(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let loaded = state.caregivers.load(session.session()).await?;
    Ok(Json(CaregiversResponse {
        groups: CaregiverGroups::build(&loaded.value),
        data: loaded.value,
        source: loaded.tier,
    }))
}

#[instrument(skip(state, session, request))]
pub async fn create_caregiver(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<NewCaregiver>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let caregiver = state.caregivers.add(session.session(), request).await?;
    info!("Caregiver created with ID: {}", caregiver.id);
    Ok((StatusCode::CREATED, Json(caregiver)))
}
