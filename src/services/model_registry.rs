use crate::model::{ArtifactLoader, ModelArtifact, ModelSource};
use arc_swap::ArcSwapOption;
use std::borrow::Cow;
use std::fs;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Model source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Model artifact is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Unloaded,
    Ready,
}

/// Holds the single active model artifact.
///
/// Readers take an `Arc` snapshot of the slot; `load` builds the new artifact
/// completely before a single pointer store publishes it. No lock is held while
/// an artifact is being deserialized, and a failed load never touches the slot.
pub struct ModelRegistry {
    slot: ArcSwapOption<ModelArtifact>,
    loader: Box<dyn ArtifactLoader>,
    input_size: u32,
}

impl ModelRegistry {
    pub fn new(loader: Box<dyn ArtifactLoader>, input_size: u32) -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            loader,
            input_size,
        }
    }

    pub fn load(&self, source: &ModelSource) -> Result<(), LoadError> {
        let identity = source.identity();
        let artifact = self.build(source, &identity).inspect_err(|err| {
            error!("Failed to load model from {}: {}", identity, err);
        })?;

        let previous = self.slot.swap(Some(Arc::new(artifact)));
        match previous {
            Some(old) => info!("Model replaced: {} -> {}", old.identity(), identity),
            None => info!("Model loaded: {}", identity),
        }
        Ok(())
    }

    fn build(&self, source: &ModelSource, identity: &str) -> Result<ModelArtifact, LoadError> {
        let bytes = match source {
            ModelSource::Path(path) => {
                if !path.exists() {
                    return Err(LoadError::SourceUnavailable(format!(
                        "model file not found: {}",
                        path.display()
                    )));
                }
                Cow::Owned(
                    fs::read(path).map_err(|e| LoadError::SourceUnavailable(e.to_string()))?,
                )
            }
            ModelSource::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
        };
        if bytes.is_empty() {
            return Err(LoadError::SourceUnavailable(
                "model artifact is empty".to_string(),
            ));
        }

        let scorer = self
            .loader
            .deserialize(&bytes, self.input_size)
            .map_err(LoadError::Malformed)?;
        Ok(ModelArtifact::new(identity, scorer))
    }

    /// Snapshot of the active artifact, unaffected by later swaps.
    pub fn current(&self) -> Option<Arc<ModelArtifact>> {
        self.slot.load_full()
    }

    pub fn state(&self) -> RegistryState {
        if self.slot.load().is_some() {
            RegistryState::Ready
        } else {
            RegistryState::Unloaded
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == RegistryState::Ready
    }
}
