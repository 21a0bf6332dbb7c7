//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all provider calls
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while talking to a quote provider.
///
/// Each variant maps to a short, stable [`code`](Self::code) that callers
/// surface to users, and to a [`RetryClass`] that drives the retry loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// No API key is configured. Raised before any network I/O.
    #[error("Missing Finnhub API key")]
    MissingApiKey,

    /// The provider rejected the key (HTTP 401).
    #[error("Invalid Finnhub API key")]
    InvalidApiKey,

    /// The provider rate limited the request (HTTP 429).
    /// Should retry with exponential backoff.
    #[error("Rate limited by {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    /// Should retry with exponential backoff.
    #[error("Request to {provider} timed out")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a 5xx status.
    #[error("{provider} server error (HTTP {status})")]
    ServerError { provider: String, status: u16 },

    /// Any other non-success status. Terminal.
    #[error("{provider} returned HTTP {status}: {message}")]
    HttpStatus {
        provider: String,
        status: u16,
        message: String,
    },

    /// Connection-level failure (DNS, refused, reset).
    #[error("Network error talking to {provider}: {message}")]
    Network { provider: String, message: String },

    /// The response body could not be decoded.
    #[error("Failed to parse {provider} response: {message}")]
    Parse { provider: String, message: String },

    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider does not implement this operation.
    #[error("{operation} is not supported by {provider}")]
    NotSupported {
        operation: String,
        provider: String,
    },
}

impl MarketDataError {
    /// Short machine-readable code, e.g. `RATE_LIMIT`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "NO_API_KEY",
            Self::InvalidApiKey => "INVALID_KEY",
            Self::RateLimited { .. } => "RATE_LIMIT",
            Self::Timeout { .. } => "TIMEOUT",
            Self::ServerError { .. } => "SERVER_ERROR",
            Self::HttpStatus { .. } => "HTTP_ERROR",
            Self::Network { .. } => "NETWORK",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::SymbolNotFound(_) => "NOT_FOUND",
            Self::NotSupported { .. } => "NOT_SUPPORTED",
        }
    }

    /// HTTP status associated with the failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidApiKey => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::ServerError { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use heatmap_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "FINNHUB".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::InvalidApiKey;
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ServerError { .. }
            | Self::Network { .. } => RetryClass::WithBackoff,

            Self::MissingApiKey
            | Self::InvalidApiKey
            | Self::HttpStatus { .. }
            | Self::Parse { .. }
            | Self::SymbolNotFound(_)
            | Self::NotSupported { .. } => RetryClass::Never,
        }
    }

    /// Formats the error as `"<CODE>: <message>"` for user-facing error maps.
    pub fn display_with_code(&self) -> String {
        format!("{}: {}", self.code(), self)
    }
}
