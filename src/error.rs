//! Error types for the sentiment service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Tokenization error: {0}")]
    Tokenization(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Language resource unavailable: {0}")]
    Resource(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<candle_core::Error> for ServiceError {
    fn from(value: candle_core::Error) -> Self {
        ServiceError::Inference(value.to_string())
    }
}

impl From<hf_hub::api::sync::ApiError> for ServiceError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        ServiceError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(value: config::ConfigError) -> Self {
        ServiceError::Config(value.to_string())
    }
}

impl ServiceError {
    /// True for errors caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::InvalidRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
