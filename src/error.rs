//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    AiProvider {
        /// HTTP-like status reported by the provider, when available.
        status: Option<u16>,
        message: String,
    },

    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    pub fn ai_provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::AiProvider {
            status,
            message: message.into(),
        }
    }

    /// Upstream status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AiProvider { status, .. } => *status,
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for the provider's rate-limit signal. This is the only error
    /// class the retry policy treats as transient.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification() {
        let err = Error::ai_provider(Some(429), "quota exhausted");
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_other_statuses_are_not_rate_limited() {
        assert!(!Error::ai_provider(Some(403), "forbidden").is_rate_limited());
        assert!(!Error::ai_provider(None, "no status").is_rate_limited());
        assert!(!Error::Generic("boom".to_string()).is_rate_limited());
    }

    #[test]
    fn test_ai_provider_display_is_the_message() {
        let err = Error::ai_provider(Some(500), "Gemini API error (status 500): oops");
        assert_eq!(err.to_string(), "Gemini API error (status 500): oops");
    }
}
