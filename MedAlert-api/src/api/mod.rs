pub mod error;
pub mod handlers;
pub mod routes;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Create the application router
pub fn create_application(state: AppState) -> Router {
    routes::create_app(state)
}
