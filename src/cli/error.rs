use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid reference time: {0}")]
    InvalidDate(String),

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Steps(#[from] stepstats::Error),
}
