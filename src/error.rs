use thiserror::Error;

use crate::chat::ChatError;
use crate::config::ConfigError;
use crate::provider::AiError;

/// Top-level error type for pm-chat
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Prompt is required")]
    MissingPrompt,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
