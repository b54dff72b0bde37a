/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Currency code absent from the gateway's pricing table
    #[error("Unknown currency code {0}")]
    UnknownCurrency(String),

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required order data absent at conversion time
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Gateway callback payload could not be decoded
    #[error("Callback error: {0}")]
    Callback(String),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn missing_field(name: impl Into<String>) -> Self {
        AppError::MissingField(name.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn callback(msg: impl Into<String>) -> Self {
        AppError::Callback(msg.into())
    }
}
