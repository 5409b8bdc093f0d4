use thiserror::Error;

use super::{ConfigError, DecodeError, DomainError, RequestError, TransportError};

/// Top-level error returned by request building, response decoding and
/// client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The method type or client is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request descriptor could not be built.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The response body could not be decoded into the bound type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The API answered, but reported a failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The transport failed or is unavailable.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
