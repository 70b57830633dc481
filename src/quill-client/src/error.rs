//! Error types for the chat API client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the chat client.
///
/// Nothing here is retried automatically; each variant is reported to the
/// immediate caller, which decides what to do with it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure: DNS, refused connection, or timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status. The raw response body is
    /// carried along for diagnostics.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The buffered response envelope could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The response body failed mid-stream. Text accumulated up to that
    /// point cannot be trusted to match what a buffered call would have
    /// returned.
    #[error("failed to read streaming response: {0}")]
    StreamRead(#[from] std::io::Error),

    /// The user interrupted the operation. Not a failure of the remote
    /// system; presented distinctly so callers can avoid alarming anyone.
    #[error("operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Whether this error is a user-initiated cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_body() {
        let err = ClientError::Api {
            status: 429,
            body: r#"{"error":"rate limited"}"#.to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_cancelled_is_distinguishable() {
        assert!(ClientError::Cancelled.is_cancelled());
        let err = ClientError::Api {
            status: 500,
            body: String::new(),
        };
        assert!(!err.is_cancelled());
    }
}
