//! Error types for coach-rag
//!
//! Retrieval failures (`SearchBackend`) are contained by the orchestrator;
//! every other variant propagates to the caller.

use thiserror::Error;

/// Main error type for the coaching pipeline
#[derive(Error, Debug)]
pub enum CoachError {
    /// Request rejected before any retrieval attempt
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Vector search backend failure (transport, timeout, non-2xx, bad body)
    #[error("{}", format_search_error(*status, message))]
    SearchBackend {
        status: Option<u16>,
        message: String,
    },

    /// Text-generation backend failure
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

fn format_search_error(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Vector search failed ({}): {}", code, message),
        None => format!("Vector search failed: {}", message),
    }
}

impl CoachError {
    /// Build a search backend error from a reqwest failure. Timeouts are
    /// marked as such in the message.
    pub fn search_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        CoachError::SearchBackend {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }

    /// True for errors the orchestrator degrades instead of propagating
    pub fn is_search_backend(&self) -> bool {
        matches!(self, CoachError::SearchBackend { .. })
    }
}

/// Backend error bodies are cut to this many characters
pub const MAX_ERROR_BODY_CHARS: usize = 800;

/// Leading part of a backend error body, for diagnostics
pub fn error_excerpt(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_display_with_status() {
        let err = CoachError::SearchBackend {
            status: Some(503),
            message: "upstream unavailable".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("upstream unavailable"));
        assert!(err.is_search_backend());
    }

    #[test]
    fn test_search_error_display_without_status() {
        let err = CoachError::SearchBackend {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Vector search failed: connection refused");
    }

    #[test]
    fn test_generation_error_is_not_search() {
        let err = CoachError::Generation("model offline".to_string());
        assert!(!err.is_search_backend());
        assert!(err.to_string().contains("model offline"));
    }

    #[test]
    fn test_error_excerpt_caps_body() {
        let body = "<html>".repeat(500);
        assert_eq!(error_excerpt(&body).chars().count(), MAX_ERROR_BODY_CHARS);
        assert_eq!(error_excerpt("short"), "short");
    }

    #[test]
    fn test_timeout_is_search_backend() {
        let err = CoachError::SearchBackend {
            status: None,
            message: "request timed out: deadline elapsed".to_string(),
        };
        assert!(err.is_search_backend());
        assert!(err.to_string().starts_with("Vector search failed: request timed out"));
    }
}
