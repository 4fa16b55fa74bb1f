use crate::controllers::{internal_error, read_file_field};
use crate::model::ModelSource;
use crate::services::classifier_service::ClassifierServiceState;
use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize)]
struct UploadResponse {
    message: String,
}

pub async fn post_upload_model(
    State(service): State<ClassifierServiceState>,
    multipart: Multipart,
) -> Response {
    let bytes = match read_file_field(multipart, "model_file", "No model file uploaded").await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };
    info!("Received model upload: {} bytes", bytes.len());

    let source = ModelSource::Bytes(Vec::from(bytes));
    match tokio::task::spawn_blocking(move || service.replace_model(source)).await {
        Ok(Ok(())) => Json(UploadResponse {
            message: "Model uploaded and loaded successfully!".to_string(),
        })
        .into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(err) => {
            error!("Model load task failed: {}", err);
            internal_error(format!("Error loading model: {}", err))
        }
    }
}
