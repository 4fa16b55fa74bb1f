use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised by a model while scoring a tensor.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ScoreError(pub String);

/// A loaded inference function: tensor in, raw score vector out.
pub trait ScoringFunction: Send + Sync {
    fn score(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ScoreError>;
}

/// Turns serialized artifact bytes into a scoring function.
pub trait ArtifactLoader: Send + Sync {
    fn deserialize(
        &self,
        bytes: &[u8],
        input_size: u32,
    ) -> Result<Arc<dyn ScoringFunction>, String>;
}

/// Where a model artifact is read from.
#[derive(Debug, Clone)]
pub enum ModelSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ModelSource {
    pub fn identity(&self) -> String {
        match self {
            ModelSource::Path(path) => path.display().to_string(),
            ModelSource::Bytes(bytes) => format!("<upload: {} bytes>", bytes.len()),
        }
    }
}

/// Immutable once built. Replacing the active model always builds a new one.
pub struct ModelArtifact {
    identity: String,
    scorer: Arc<dyn ScoringFunction>,
}

impl ModelArtifact {
    pub fn new(identity: impl Into<String>, scorer: Arc<dyn ScoringFunction>) -> Self {
        Self {
            identity: identity.into(),
            scorer,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn score(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ScoreError> {
        self.scorer.score(tensor)
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// NHWC `f32` tensor with a leading batch dimension of one.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    pub const CHANNELS: usize = 3;

    pub(crate) fn new(side: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), side * side * Self::CHANNELS);
        Self {
            shape: [1, side, side, Self::CHANNELS],
            data,
        }
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at batch 0, row `y`, column `x`, channel `c`.
    #[cfg(test)]
    pub fn at(&self, y: usize, x: usize, c: usize) -> f32 {
        let [_, _, width, channels] = self.shape;
        self.data[(y * width + x) * channels + c]
    }
}

/// Ordered class names; index `i` names `scores[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels(Arc<[String]>);

impl ClassLabels {
    pub fn new(labels: Vec<String>) -> Option<Self> {
        (!labels.is_empty()).then(|| ClassLabels(labels.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(rename = "predicted_class")]
    pub label: String,
    pub confidence: f32,
    #[serde(rename = "predictions")]
    pub scores: Vec<f32>,
}
