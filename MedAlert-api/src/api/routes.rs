use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::{caregivers, emergency, health, medications, profile, vitals};
use crate::state::AppState;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Specific routes before parametrized ones
    let api_routes = Router::new()
        .route("/medications/overview", get(medications::medication_overview))
        .route(
            "/medications",
            get(medications::list_medications).post(medications::create_medication),
        )
        .route("/medications/:id/take", post(medications::take_medication))
        .route("/vitals/summary", get(vitals::vitals_summary))
        .route("/vitals", get(vitals::list_vitals).post(vitals::record_vitals))
        .route(
            "/caregivers",
            get(caregivers::list_caregivers).post(caregivers::create_caregiver),
        )
        .route("/profile/preferences", put(profile::update_preference))
        .route("/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/emergency/contacts", get(emergency::emergency_contacts));

    debug!("API routes configured");

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use med_alert_data::repository::{InMemoryStore, RestRemoteStore};
    use med_alert_data::RemoteConfig;

    use crate::state::{LocalBackend, RemoteBackend};

    fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        authed_as("user-1", method, uri, body)
    }

    fn authed_as(user_id: &str, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer token-{}", user_id))
            .header("x-user-id", user_id)
            .header("x-user-name", "Asha Rao");
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_app(AppState::in_memory());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["stores"]["local"], "memory");
    }

    #[tokio::test]
    async fn test_medications_seed_then_remote() {
        let app = create_app(AppState::in_memory());

        let (status, body) = send(&app, authed("GET", "/api/v1/medications", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "seed");
        assert!(!body["data"].as_array().unwrap().is_empty());

        let (_, body) = send(&app, authed("GET", "/api/v1/medications", None)).await;
        assert_eq!(body["source"], "remote");
    }

    #[tokio::test]
    async fn test_request_without_session_is_unauthorized() {
        let app = create_app(AppState::in_memory());
        let request = Request::builder()
            .uri("/api/v1/medications")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_create_medication() {
        let app = create_app(AppState::in_memory());
        let request = authed(
            "POST",
            "/api/v1/medications",
            Some(json!({ "name": "Amlodipine", "dosage": "5mg", "frequency": "Twice daily" })),
        );

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Amlodipine");
        assert_eq!(body["times"], json!(["08:00", "20:00"]));
        assert_eq!(body["pillsRemaining"], 30);
    }

    #[tokio::test]
    async fn test_users_only_see_their_own_medications() {
        let app = create_app(AppState::in_memory());
        let request = authed_as(
            "alice",
            "POST",
            "/api/v1/medications",
            Some(json!({ "name": "Alice private", "dosage": "5mg", "frequency": "Once daily" })),
        );
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, authed_as("bob", "GET", "/api/v1/medications", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "seed");
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|med| med["name"].as_str())
            .collect();
        assert!(!names.contains(&"Alice private"));

        let (_, body) = send(&app, authed_as("alice", "GET", "/api/v1/medications", None)).await;
        assert!(body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|med| med["name"] == "Alice private"));
    }

    #[tokio::test]
    async fn test_create_medication_validation() {
        let app = create_app(AppState::in_memory());
        let request = authed(
            "POST",
            "/api/v1/medications",
            Some(json!({ "name": "Amlodipine", "dosage": "  ", "frequency": "Once daily" })),
        );

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Dosage is required");
    }

    #[tokio::test]
    async fn test_take_unknown_medication() {
        let app = create_app(AppState::in_memory());

        let (status, body) = send(&app, authed("POST", "/api/v1/medications/nope/take", None)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_record_vitals_requires_a_measurement() {
        let app = create_app(AppState::in_memory());

        let (status, body) = send(&app, authed("POST", "/api/v1/vitals", Some(json!({})))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please enter at least one vital sign measurement");
    }

    #[tokio::test]
    async fn test_caregivers_include_groups() {
        let app = create_app(AppState::in_memory());

        let (status, body) = send(&app, authed("GET", "/api/v1/caregivers", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["groups"].is_object());
    }

    #[tokio::test]
    async fn test_emergency_contacts_start_with_services() {
        let app = create_app(AppState::in_memory());

        let (status, body) = send(&app, authed("GET", "/api/v1/emergency/contacts", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["phone"], "112");
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_bad_gateway() {
        let remote = RestRemoteStore::new(RemoteConfig::new("http://127.0.0.1:9")).unwrap();
        let state = AppState::new(
            LocalBackend::Memory(InMemoryStore::new()),
            RemoteBackend::Rest(remote),
        );
        let app = create_app(state);

        let (status, body) = send(&app, authed("GET", "/api/v1/vitals", None)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "bad_gateway");
    }
}
