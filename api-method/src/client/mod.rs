//! Clients that own a lazily created transport.
//!
//! - [`Transport`] executes [`Request`](crate::Request)s; [`ReqwestTransport`]
//!   is the stock implementation.
//! - [`Lifecycle`] creates the transport on first use and closes it once.
//! - [`ApiClient`] drives methods through the transport; [`RestClient`] is the
//!   ready-made client over `reqwest`.

mod api_client;
mod config;
mod lifecycle;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use api_client::{ApiClient, RestClient};
pub use config::{ClientConfig, ClientConfigBuilder, BASE_URL_ENV, TIMEOUT_ENV};
pub use lifecycle::{Lifecycle, LifecycleState, TransportFactory};
pub use transport::{BoxFuture, ReqwestTransport, Transport};
