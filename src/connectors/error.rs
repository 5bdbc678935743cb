use crate::models::Platform;
use thiserror::Error;

/// Errors returned by the HTTP connectors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-2xx status.
    #[error("{platform} returned HTTP {status} for handle '{handle}'")]
    Status {
        platform: Platform,
        handle: String,
        status: u16,
    },

    /// The response body could not be deserialized into the profile shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
