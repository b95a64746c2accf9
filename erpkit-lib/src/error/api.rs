//! API error types

use std::time::Duration;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message, extracted from the body when possible.
        message: String,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// Short message for field-level or toast display.
    ///
    /// Backend messages are passed through for 4xx responses since they
    /// usually describe what was wrong with the submitted value.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { status, message } if (400..500).contains(status) && !message.is_empty() => {
                message.clone()
            }
            Self::Http { status, .. } => format!("Server error ({status})"),
            Self::Network(_) | Self::Timeout(_) => "Could not reach the server".to_string(),
            Self::InvalidUrl(url) => format!("Invalid endpoint: {url}"),
            Self::Parse { .. } => "Unexpected response from the server".to_string(),
        }
    }

    /// Builds an HTTP error from a response body, pulling the message out of
    /// `{"message": ..}`, `{"error": ..}` or `{"error": {"message": ..}}` when present.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(|m| m.as_str())
                    .or_else(|| json.get("error").and_then(|e| e.as_str()))
                    .or_else(|| {
                        json.get("error")
                            .and_then(|e| e.get("message"))
                            .and_then(|m| m.as_str())
                    })
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());
        Self::http(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_extracts_message() {
        let err = ApiError::from_body(422, r#"{"message":"Role already exists"}"#);
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.user_message(), "Role already exists");
    }

    #[test]
    fn test_from_body_nested_error() {
        let err = ApiError::from_body(400, r#"{"error":{"message":"bad name"}}"#);
        assert_eq!(err.user_message(), "bad name");
    }

    #[test]
    fn test_from_body_plain_text() {
        let err = ApiError::from_body(503, "upstream down\n");
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "Server error (503)");
    }
}
