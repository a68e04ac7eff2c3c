use thiserror::Error;

/// All errors that can occur when using the Bambuser client.
#[derive(Error, Debug)]
pub enum BambuserError {
    /// The client is missing credentials or was configured inconsistently.
    #[error("configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument failed validation. No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A list query used a key outside the accepted parameter set, or was not
    /// a mapping at all (`None`). No request was sent.
    #[error("unsupported query parameter{}", .0.as_deref().map(|k| format!(" {k}")).unwrap_or_default())]
    UnsupportedQueryParameter(Option<String>),

    /// The request was rate-limited (HTTP 429).
    #[error("rate limit exceeded")]
    RateLimited,

    /// The requested resource was not found (HTTP 404).
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx response, carrying the raw response body.
    #[error("API error {status_code}: {body}")]
    Api { status_code: u16, body: String },

    /// The server answered with something that does not follow the list
    /// response contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl BambuserError {
    /// Map a non-success HTTP status and its body text to a typed error.
    pub(crate) fn from_status(status_code: u16, body: String) -> Self {
        match status_code {
            404 => BambuserError::NotFound,
            429 => BambuserError::RateLimited,
            _ => BambuserError::Api { status_code, body },
        }
    }
}

/// A convenience alias for `Result<T, BambuserError>`.
pub type Result<T> = std::result::Result<T, BambuserError>;
