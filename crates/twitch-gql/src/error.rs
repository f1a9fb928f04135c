//! Error types for the GraphQL client

/// Errors returned by the client
///
/// A lookup that finds nothing is not an error: those calls return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied no usable identity, or one that cannot be embedded in a query
    #[error("Invalid input: {0}")]
    Input(String),

    /// The response was not a 200 with a JSON body
    #[error("Unexpected response: status {status}, content type {}", content_type.as_deref().unwrap_or("<none>"))]
    Protocol {
        status: u16,
        content_type: Option<String>,
    },

    /// The server returned a top-level `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid cursor: {0}")]
    Cursor(String),

    /// The response parsed but did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
