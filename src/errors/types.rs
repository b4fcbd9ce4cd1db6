use thiserror::Error;

#[derive(Debug, Error)]
pub enum BouncerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Quota exceeded: {0}")]
    Quota(String),

    #[error("Signal provider error: {0}")]
    SignalProvider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("CRM push error: {0}")]
    CrmPush(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
