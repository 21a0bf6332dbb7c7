//! Errors raised by the dashboard client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The server answered with a non-success status. `code` is the
    /// machine-readable code from the error body when one was sent.
    #[error("HTTP {status}{}: {message}", code_suffix(.code))]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Local cache error: {0}")]
    Cache(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" {}", c)).unwrap_or_default()
}

impl ClientError {
    /// Rate limits and timeouts are worth another try.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Http { status: 429, .. }
        )
    }
}
