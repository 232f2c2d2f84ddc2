//! REST endpoints for registration progress and submission.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::RegistrationError;

use super::controller::RegistrationSessionController;
use super::form::RegistrationForm;
use super::identity::CurrentIdentity;

/// Shared state for registration routes.
#[derive(Clone)]
pub struct RegistrationRouteState {
    pub controller: Arc<RegistrationSessionController>,
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedRecord { .. } | Self::InvalidRecord(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({
            "error": self.to_string(),
            "retryable": self.is_retryable(),
        });
        (status, Json(body)).into_response()
    }
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "Sign in to register"})),
    )
        .into_response()
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "event-register"
    }))
}

/// GET /api/registration/progress
///
/// Returns the flow directive for the caller plus the resolved `state` and
/// matched `rule`. Without an identity this is a bare `redirect_to_login`,
/// not an error.
async fn get_progress(
    State(state): State<RegistrationRouteState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> impl IntoResponse {
    Json(state.controller.session(identity.as_ref()).await)
}

/// GET /api/registration/form
async fn get_form(
    State(state): State<RegistrationRouteState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Response {
    match identity {
        Some(identity) => Json(state.controller.prefilled_form(&identity)).into_response(),
        None => unauthenticated(),
    }
}

/// POST /api/registration
async fn submit(
    State(state): State<RegistrationRouteState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(form): Json<RegistrationForm>,
) -> Response {
    let Some(identity) = identity else {
        return unauthenticated();
    };
    match state.controller.submit(&identity, form).await {
        Ok(directive) => Json(directive).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Build the registration REST routes.
pub fn registration_routes(state: RegistrationRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/registration", post(submit))
        .route("/api/registration/progress", get(get_progress))
        .route("/api/registration/form", get(get_form))
        .with_state(state)
}
