use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use med_alert_domain::services::NewVitalSigns;

use super::LoadedResponse;
use crate::api::error::ErrorResponse;
use crate::api::session::CurrentSession;
use crate::state::AppState;

#[instrument(skip(state, session))]
pub async fn list_vitals(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let loaded = state.vitals.load(session.session()).await?;
    Ok(Json(LoadedResponse::from(loaded)))
}

#[instrument(skip(state, session, request))]
pub async fn record_vitals(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<NewVitalSigns>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let record = state.vitals.record(session.session(), request).await?;
    info!("Vital signs recorded with ID: {}", record.id);
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, session))]
pub async fn vitals_summary(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let summary = state.vitals.summary(session.session()).await?;
    Ok(Json(summary))
}
