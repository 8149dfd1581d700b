use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    /// No model credential is configured
    #[error("AI service unavailable: no API key configured")]
    ServiceUnavailable,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Model error (status {status}): {message}")]
    Model { status: u16, message: String },

    /// Structured response did not match the expected shape
    #[error("Unexpected model response: {0}")]
    SchemaViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Onboarding event that does not apply to the current step
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl MarketError {
    /// Short message suitable for a dismissible inline notice
    pub fn notice(&self) -> &'static str {
        match self {
            MarketError::ServiceUnavailable => {
                "AI analysis is unavailable right now. The API Key is missing."
            }
            MarketError::Storage(_) => "Could not save your changes. Please try again.",
            MarketError::InvalidTransition(_) => "That step is not available right now.",
            _ => "Could not analyze land suitability. Please try again.",
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        MarketError::Storage(err.to_string())
    }
}
