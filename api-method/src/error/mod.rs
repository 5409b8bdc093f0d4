//! Layered error types for the API method engine.
//!
//! Each failure mode surfaces as its own error family so callers can react
//! precisely:
//! - [`ApiError`] - Top-level error type for all operations
//! - [`ConfigError`] - Method or client declared incorrectly (programmer error)
//! - [`RequestError`] - Request descriptor could not be built
//! - [`DecodeError`] - Response body does not fit the bound return type
//! - [`DomainError`] - The API reported a logical failure
//! - [`TransportError`] - HTTP transport and lifecycle failures

mod api_error;
mod config_error;
mod decode_error;
mod domain_error;
mod request_error;
mod transport_error;

pub use api_error::ApiError;
pub use config_error::ConfigError;
pub use decode_error::DecodeError;
pub use domain_error::DomainError;
pub use request_error::RequestError;
pub use transport_error::TransportError;
