use thiserror::Error;

/// Errors returned by the directions client.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a status other than `OK`, e.g.
    /// `ZERO_RESULTS` or `NOT_FOUND`.
    #[error("Error getting directions, server returned: {status}")]
    Upstream {
        status: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request cannot be sent as built (bad base URL, too many waypoints).
    #[error("invalid directions request: {0}")]
    InvalidRequest(String),
}
