use crate::config::config::ResizeFilter;
use crate::config::input_size::InputSize;
use crate::model::ImageTensor;
use image::imageops;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("Image data is empty")]
    EmptyInput,
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Raw image bytes to a normalized `[1, S, S, 3]` tensor. Holds configuration only.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    input_size: InputSize,
    filter: ResizeFilter,
}

impl Preprocessor {
    pub fn new(input_size: InputSize, filter: ResizeFilter) -> Self {
        Self { input_size, filter }
    }

    pub fn input_size(&self) -> InputSize {
        self.input_size
    }

    pub fn preprocess(&self, raw: &[u8]) -> Result<ImageTensor, PreprocessError> {
        if raw.is_empty() {
            return Err(PreprocessError::EmptyInput);
        }

        let decoded = image::load_from_memory(raw)
            .map_err(|e| PreprocessError::DecodeFailed(e.to_string()))?;
        let rgb = decoded.to_rgb8();

        let side = self.input_size.side();
        let resized = imageops::resize(&rgb, side, side, self.filter.filter_type());

        let data = resized
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect();

        Ok(ImageTensor::new(side as usize, data))
    }
}
