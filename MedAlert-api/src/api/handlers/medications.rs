use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use tracing::{info, instrument};

use med_alert_domain::services::NewMedication;

use super::LoadedResponse;
use crate::api::error::ErrorResponse;
use crate::api::session::CurrentSession;
use crate::state::AppState;

#[instrument(skip(state, session))]
pub async fn list_medications(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let loaded = state.medications.load(session.session()).await?;
    Ok(Json(LoadedResponse::from(loaded)))
}

#[instrument(skip(state, session, request))]
pub async fn create_medication(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<NewMedication>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let medication = state.medications.add(session.session(), request).await?;
    info!("Medication created with ID: {}", medication.id);
    Ok((StatusCode::CREATED, Json(medication)))
}

#[instrument(skip(state, session))]
pub async fn take_medication(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let medication = state.medications.take(session.session(), &id).await?;
    Ok(Json(medication))
}

#[instrument(skip(state, session))]
pub async fn medication_overview(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let overview = state
        .medications
        .overview(session.session(), Local::now().naive_local())
        .await?;
    Ok(Json(overview))
}
