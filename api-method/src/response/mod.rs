//! Response handling.
//!
//! [`HttpResponse`] is the transport-agnostic view of an HTTP reply that
//! [`ApiMethod::parse_response`](crate::ApiMethod::parse_response) decodes.
//! The [`policy`] module holds validation checks shared by many methods.

mod http_response;
pub mod policy;

pub use http_response::HttpResponse;
