use thiserror::Error;

/// Transport-level failures, including the transport lifecycle.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request endpoint could not be resolved into a URL.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as built by the method.
        endpoint: String,
        /// Why it could not be resolved.
        reason: String,
    },

    /// A request header is not valid HTTP.
    #[error("invalid request header '{0}'")]
    InvalidHeader(String),

    /// The transport could not be created.
    #[error("failed to create transport: {0}")]
    Creation(String),

    /// The client was closed; its transport is gone for good.
    #[error("client is closed")]
    Closed,
}
