use thiserror::Error;

/// Application-level error type.
///
/// Extraction and scoring never fail; these variants cover startup
/// (configuration, vocabulary tables) and the text source adapter.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Text extraction failed: {0}")]
    TextSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code, used when a failure is reported per document.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Vocabulary(_) => "VOCABULARY_ERROR",
            AppError::Pattern(_) => "PATTERN_ERROR",
            AppError::TextSource(_) => "TEXT_SOURCE_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
