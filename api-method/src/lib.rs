//! Declarative API methods and the clients that run them.
//!
//! A method is a `Serialize` struct implementing [`ApiMethod`]. The engine
//! turns an instance into a transport-agnostic [`Request`] (URL template
//! substitution, query params or form data or a templated JSON payload) and
//! decodes a raw [`HttpResponse`] into the method's bound return type.
//!
//! ## Modules
//!
//! - [`api_method`] - the [`ApiMethod`] trait and field metadata
//! - [`request`] - the [`Request`] descriptor and URL formatting
//! - [`template`] - JSON payload templates and [`RuntimeValue`] placeholders
//! - [`returning`] - return-type binding
//! - [`response`] - [`HttpResponse`] and shared validation policies
//! - [`client`] - transports, the lifecycle manager and [`client::RestClient`]
//! - [`error`] - layered error types

pub mod api_method;
pub mod client;
pub mod error;
pub mod method;
pub mod request;
pub mod response;
pub mod returning;
pub mod template;

pub use api_method::{ApiMethod, FieldLocation, FieldSpec, DEFAULT_EXCLUDE};
pub use error::{ApiError, ConfigError, DecodeError, DomainError, RequestError, TransportError};
pub use method::RestMethod;
pub use request::Request;
pub use response::HttpResponse;
pub use returning::{check_binding, ReturnBinding, ReturnType, Returnable, Shape};
pub use template::{RuntimeValue, Template, TemplateNode};
