use thiserror::Error;

use crate::ai::AiError;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Recipe generation failed: {0}")]
    Remote(#[from] AiError),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Model returned an incomplete recipe: {0}")]
    InvalidRecipe(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit} bytes")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize cookbook: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Voice input is not supported on this system")]
    Unsupported,

    #[error("Voice capture failed: {0}")]
    Failed(String),
}
