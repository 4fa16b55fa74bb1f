use crate::model::{ArtifactLoader, ClassLabels, ModelSource, PredictionResult};
use crate::repositories::model_file_repository::ModelFileRepository;
use crate::services::inference::infer;
use crate::services::model_registry::ModelRegistry;
use crate::services::preprocessor::Preprocessor;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Model is not loaded")]
    ModelUnavailable,
    #[error("Failed to process image: {0}")]
    BadInput(String),
    #[error("Prediction error: {0}")]
    InferenceFailed(String),
    #[error("Error loading model: {0}")]
    ModelLoadFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Ready,
    NotReady,
}

pub type ClassifierServiceState = Arc<ClassifierService>;

/// Entry point for the HTTP handlers. All methods are blocking.
pub struct ClassifierService {
    registry: ModelRegistry,
    preprocessor: Preprocessor,
    labels: ClassLabels,
    model_file: Option<ModelFileRepository>,
    // Serializes swap + persist among writers. Readers never take it.
    replace_lock: Mutex<()>,
}

impl ClassifierService {
    pub fn new(
        loader: Box<dyn ArtifactLoader>,
        preprocessor: Preprocessor,
        labels: ClassLabels,
        model_file: Option<ModelFileRepository>,
    ) -> Self {
        Self {
            registry: ModelRegistry::new(loader, preprocessor.input_size().side()),
            preprocessor,
            labels,
            model_file,
            replace_lock: Mutex::new(()),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        if self.registry.is_ready() {
            ServiceStatus::Ready
        } else {
            ServiceStatus::NotReady
        }
    }

    pub fn predict(&self, raw: &[u8]) -> Result<PredictionResult, ServiceError> {
        // Captured once: a concurrent swap does not affect this request.
        let artifact = self
            .registry
            .current()
            .ok_or(ServiceError::ModelUnavailable)?;

        let tensor = self
            .preprocessor
            .preprocess(raw)
            .map_err(|e| ServiceError::BadInput(e.to_string()))?;

        let result = infer(&tensor, &artifact, &self.labels)
            .map_err(|e| ServiceError::InferenceFailed(e.to_string()))?;
        debug!(
            "Predicted {} ({:.4}) with {}",
            result.label,
            result.confidence,
            artifact.identity()
        );
        Ok(result)
    }

    pub fn replace_model(&self, source: ModelSource) -> Result<(), ServiceError> {
        let _guard = self.replace_lock.lock();
        self.registry
            .load(&source)
            .map_err(|e| ServiceError::ModelLoadFailed(e.to_string()))?;

        if let (ModelSource::Bytes(bytes), Some(model_file)) = (&source, &self.model_file) {
            if let Err(err) = model_file.store(bytes) {
                warn!(
                    "Model is active but could not be written to {}: {}",
                    model_file.path().display(),
                    err
                );
            }
        }
        Ok(())
    }
}
