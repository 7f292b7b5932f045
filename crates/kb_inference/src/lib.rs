use std::time::Duration;

pub mod checkpoint;
pub mod embeddings;
pub mod models;
pub mod pipeline;
pub mod preprocess;

pub use checkpoint::{CheckpointConfig, CheckpointFetcher};
pub use models::create_model;
pub use pipeline::{Pipeline, PipelineConfig};

pub const DEFAULT_INFERENCE_URL: &str = "http://127.0.0.1:8000";

/// Model selection and connection settings shared by every model backend.
#[derive(Clone)]
pub struct Config {
    /// `remote` (inference service) or `dummy` (offline heuristics)
    pub model_name: String,
    pub inference_url: String,
    /// Access token for the model registry
    pub api_key: Option<String>,
    /// Fine-tuned classifier weights to fetch and load at startup
    pub checkpoint: Option<CheckpointConfig>,
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("model_name", &self.model_name)
            .field("inference_url", &self.inference_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("checkpoint", &self.checkpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: "remote".to_string(),
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            api_key: None,
            checkpoint: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Backend-specific settings derived from the shared `Config`.
pub trait ModelConfig {
    fn from_inference_config(config: &Config) -> Self;
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::pipeline::Pipeline;
    pub use super::Config;
    pub use kb_core::{Analysis, Article, Error, InferenceModel, Result};
}
