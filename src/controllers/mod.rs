pub mod predict;
pub mod status;
pub mod upload_model;

use crate::app_error::ErrorResponse;
use crate::services::classifier_service::ClassifierServiceState;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

pub fn router(state: ClassifierServiceState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(status::get_home))
        .route("/health", get(status::get_health))
        .route("/status", get(status::get_status))
        .route("/predict", post(predict::post_predict))
        .route("/upload_model", post(upload_model::post_upload_model))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

/// Reads the first multipart file field called `name`, answering 400 with
/// `missing` when the form has no such field.
async fn read_file_field(
    mut multipart: Multipart,
    name: &str,
    missing: &str,
) -> Result<Bytes, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(bad_request(missing)),
            Err(err) => {
                warn!("Malformed multipart body: {}", err);
                return Err(bad_request(format!("Malformed multipart body: {}", err)));
            }
        };
        if field.name() != Some(name) {
            continue;
        }
        if field.file_name() == Some("") {
            return Err(bad_request("No selected file"));
        }
        return field.bytes().await.map_err(|err| {
            warn!("Failed to read field {}: {}", name, err);
            bad_request(format!("Failed to read upload: {}", err))
        });
    }
}

fn bad_request(message: impl ToString) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

fn internal_error(message: impl ToString) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}
