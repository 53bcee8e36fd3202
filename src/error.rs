//! Error handling for stockwatch
//!
//! Library boundaries return the typed errors below so callers can tell a
//! missing price apart from a failed AI judgment. The CLI layer wraps them in
//! `anyhow` for context chaining.

use thiserror::Error;

/// The two user-visible failure shapes of a price snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// No price data for this ticker right now (unknown symbol, outage, timeout).
    #[error("price data unavailable: {0}")]
    Unavailable(String),

    /// Price history is degenerate; relative change cannot be computed.
    #[error("invalid price data: {0}")]
    InvalidData(String),
}

/// Failures raised by a market data source before the engine sees them.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("failed to decode provider payload: {0}")]
    Decode(String),
}

impl From<SourceError> for PriceError {
    fn from(err: SourceError) -> Self {
        PriceError::Unavailable(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("news API key is not configured")]
    NotConfigured,

    #[error("news transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("news provider returned status {0}")]
    Status(u16),

    #[error("news provider rate limit: {0}")]
    RateLimited(String),

    #[error("news provider error: {0}")]
    Provider(String),

    #[error("failed to decode news payload: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("AI API key is not configured")]
    NotConfigured,

    #[error("AI transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI provider returned status {0}: {1}")]
    Status(u16, String),

    #[error("AI returned an empty response")]
    EmptyResponse,

    #[error("failed to decode AI payload: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("sender credentials are not configured")]
    NotConfigured,

    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("invalid ticker: {0}")]
    InvalidTicker(String),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = PriceError::Unavailable("no rows for ZZZZ".to_string());
        assert_eq!(err.to_string(), "price data unavailable: no rows for ZZZZ");

        let err = PriceError::InvalidData("zero reference price".to_string());
        assert_eq!(err.to_string(), "invalid price data: zero reference price");
    }

    #[test]
    fn test_source_errors_collapse_to_unavailable() {
        let err: PriceError = SourceError::Status(503).into();
        assert_eq!(
            err,
            PriceError::Unavailable("provider returned status 503".to_string())
        );

        let err: PriceError = SourceError::Decode("missing chart".to_string()).into();
        assert!(matches!(err, PriceError::Unavailable(_)));
    }

    #[test]
    fn test_registry_io_error_names_the_cause() {
        let err: RegistryError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only home").into();
        assert_eq!(err.to_string(), "io error: read-only home");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(PriceError::InvalidData("only one close".to_string()))
            .context("failed to compute snapshot for AAPL");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to compute snapshot for AAPL"));
        assert!(format!("{:?}", err).contains("only one close"));
    }
}
