// file: src/error.rs
// version: 3.1.0
// guid: f7f3fbbf-40d7-436e-b692-a8dafd1c71e2

use thiserror::Error;

/// Result type alias for the registrar
pub type Result<T> = std::result::Result<T, RegistrarError>;

/// Error types for the fabric node registrar
#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} is not found! Check typos")]
    FileNotFound(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Login to {address} failed: {message}")]
    AuthError { address: String, message: String },

    #[error("{0}")]
    RegistrationError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid controller URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("No sites available in {0}")]
    NoSitesAvailable(String),
}

impl RegistrarError {
    /// Create a new authentication error
    pub fn auth(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AuthError {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Create a new registration error
    pub fn registration(msg: impl Into<String>) -> Self {
        Self::RegistrationError(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

impl From<inquire::InquireError> for RegistrarError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => {
                Self::PromptError("Cancelled".to_string())
            }
            other => Self::PromptError(other.to_string()),
        }
    }
}
