//! Error types for the source layer.

/// Errors that can occur while fetching lot data upstream.
///
/// Every variant means "upstream unavailable" from the game's point of
/// view; they are kept apart so logs say what actually went wrong.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request could not be sent or the body could not be read
    /// (DNS, connect, TLS, timeout).
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with a non-success status code.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The body was not valid JSON.
    #[error("upstream response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body was JSON, but neither a `data` envelope nor a bare list.
    #[error("unexpected upstream response shape: {0}")]
    UnexpectedShape(String),
}
