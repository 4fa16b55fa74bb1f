use crate::config::input_size::InputSize;
use crate::model::ClassLabels;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::error;

#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "triangle" => Ok(Self::Triangle),
            "catmullrom" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" => Ok(Self::Lanczos3),
            _ => Err(format!("Invalid resize filter: {}", s)),
        }
    }
}

impl Display for ResizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Triangle => "triangle",
            ResizeFilter::CatmullRom => "catmullrom",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Lanczos3 => "lanczos3",
        };
        write!(f, "{}", str)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    bind_address: String,
    max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            max_upload_mb: 256,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ModelConfig {
    path: PathBuf,
    input_size: InputSize,
    resize_filter: ResizeFilter,
    persist_uploads: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/skin_disease_model.onnx"),
            input_size: InputSize::default(),
            resize_filter: ResizeFilter::default(),
            persist_uploads: true,
        }
    }
}

impl ModelConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn input_size(&self) -> InputSize {
        self.input_size
    }

    pub fn resize_filter(&self) -> ResizeFilter {
        self.resize_filter
    }

    pub fn persist_uploads(&self) -> bool {
        self.persist_uploads
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    model: ModelConfig,
    #[serde(default = "default_class_labels")]
    class_labels: Vec<String>,
}

fn default_class_labels() -> Vec<String> {
    ["Acne", "Eczema", "Psoriasis", "Melanoma", "Healthy Skin"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            class_labels: default_class_labels(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error reading config: {0}")]
    Confy(#[from] confy::ConfyError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Config> {
        match Config::load_or_create(path) {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                error!("Failed to load configuration: {}", err);
                None
            }
        }
    }

    fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let cfg = if path.exists() {
            confy::load_path(path)?
        } else {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let cfg = Config::default();
            confy::store_path(path, &cfg)?;
            cfg
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.class_labels()?;
        Ok(())
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub fn class_labels(&self) -> Result<ClassLabels, ConfigError> {
        ClassLabels::new(self.class_labels.clone())
            .ok_or_else(|| ConfigError::Invalid("class_labels cannot be empty".to_string()))
    }
}
