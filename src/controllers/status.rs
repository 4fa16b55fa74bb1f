use crate::services::classifier_service::{ClassifierServiceState, ServiceStatus};
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

pub async fn get_home() -> &'static str {
    "Welcome to the image classifier backend!"
}

/// Liveness only, independent of model state.
pub async fn get_health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "OK" })
}

pub async fn get_status(
    State(service): State<ClassifierServiceState>,
) -> (StatusCode, Json<StatusResponse>) {
    match service.status() {
        ServiceStatus::Ready => (StatusCode::OK, Json(StatusResponse { status: "ready" })),
        ServiceStatus::NotReady => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse {
                status: "not_ready",
            }),
        ),
    }
}
