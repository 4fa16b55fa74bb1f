use crate::controllers::{internal_error, read_file_field};
use crate::services::classifier_service::{
    ClassifierServiceState, ServiceError, ServiceStatus,
};
use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

pub async fn post_predict(
    State(service): State<ClassifierServiceState>,
    multipart: Multipart,
) -> Response {
    if service.status() == ServiceStatus::NotReady {
        return ServiceError::ModelUnavailable.into_response();
    }

    let image = match read_file_field(multipart, "image", "No file uploaded").await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    match tokio::task::spawn_blocking(move || service.predict(&image)).await {
        Ok(Ok(prediction)) => Json(prediction).into_response(),
        Ok(Err(err)) => {
            warn!("Prediction failed: {}", err);
            err.into_response()
        }
        Err(err) => {
            error!("Prediction task failed: {}", err);
            internal_error(format!("Prediction error: {}", err))
        }
    }
}
