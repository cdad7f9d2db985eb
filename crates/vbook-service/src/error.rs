use thiserror::Error;

/// Failures of the billing backend collaborator.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Backend answered HTTP {0}")]
    Status(u16),

    /// The backend reported `success: false` with a message.
    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported report: {0}")]
    UnsupportedReport(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
