use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::api::error::ErrorResponse;
use crate::api::session::CurrentSession;
use crate::state::AppState;

/// Contacts for the SOS screen, emergency services first
#[instrument(skip(state, session))]
pub async fn emergency_contacts(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ErrorResponse> {
    let contacts = state.emergency.contacts(session.session()).await?;
    Ok(Json(contacts))
}
