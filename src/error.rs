use thiserror::Error;

/// Failures talking to the maze/score service. All of them are recoverable locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response; `message` is the service's own error text when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid data format from server: {0}")]
    Format(String),
}

impl ApiError {
    pub fn status(status: u16, service_message: Option<String>) -> Self {
        let message = service_message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Error {status}"));
        ApiError::Status { status, message }
    }
}

/// Why a score was not saved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Empty name.")]
    EmptyName,
    #[error("Invalid time.")]
    InvalidTime(f64),
    #[error("Invalid dimension.")]
    InvalidDimension(u32),
    #[error(transparent)]
    Service(#[from] ApiError),
}
