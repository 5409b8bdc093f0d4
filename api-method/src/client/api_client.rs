//! The client contract and the stock HTTP client.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::lifecycle::{Lifecycle, LifecycleState, TransportFactory};
use super::transport::{BoxFuture, ReqwestTransport, Transport};
use super::ClientConfig;
use crate::api_method::ApiMethod;
use crate::error::ApiError;

/// A client that owns one lazily created transport.
///
/// Implementors supply the [`Lifecycle`] and the transport-creation hook;
/// every provided operation goes through [`transport`](Self::transport)
/// first, so the transport exists before any work is done and is never
/// recreated after [`close`](Self::close).
#[allow(async_fn_in_trait)]
pub trait ApiClient: Send + Sync {
    /// The transport this client drives.
    type Transport: Transport + 'static;

    /// The lifecycle owning the transport.
    fn lifecycle(&self) -> &Lifecycle<Self::Transport>;

    /// Creates a new transport. Only called while none exists, and only when
    /// no factory was injected into the lifecycle.
    fn create_transport(&self) -> BoxFuture<'_, Result<Self::Transport, ApiError>>;

    /// Returns the live transport, creating it on first use.
    ///
    /// ## Errors
    ///
    /// - [`TransportError::Closed`](crate::TransportError::Closed) after close
    /// - whatever transport creation returns
    async fn transport(&self) -> Result<Arc<Self::Transport>, ApiError> {
        self.lifecycle().ensure_ready(|| self.create_transport()).await
    }

    /// Builds, sends and parses `method`.
    async fn execute<M: ApiMethod>(&self, method: &M) -> Result<M::Output, ApiError> {
        self.execute_with(method, &Map::new()).await
    }

    /// Like [`execute`](Self::execute), with caller substitutions for URL
    /// placeholders no path field covers.
    async fn execute_with<M: ApiMethod>(
        &self,
        method: &M,
        substitutions: &Map<String, Value>,
    ) -> Result<M::Output, ApiError> {
        let transport = self.transport().await?;
        let request = method.build_request_with(substitutions)?;
        let response = transport.send(&request).await?;
        M::parse_response(&response)
    }

    /// Creates the transport ahead of the first call.
    async fn warmup(&self) -> Result<(), ApiError> {
        self.transport().await.map(|_| ())
    }

    /// Shuts the transport down. Safe to call repeatedly.
    async fn close(&self) {
        self.lifecycle().close().await;
    }

    /// Scope entry: ensures the transport exists and yields the client.
    async fn enter(&self) -> Result<&Self, ApiError> {
        self.transport().await?;
        Ok(self)
    }

    /// Scope exit: closes the transport.
    async fn exit(&self) {
        self.close().await;
    }

    /// Runs `body` between [`enter`](Self::enter) and [`exit`](Self::exit).
    ///
    /// `exit` runs whether `body` succeeds or fails.
    async fn scoped<'a, F, Fut, R>(&'a self, body: F) -> Result<R, ApiError>
    where
        Self: Sized,
        F: FnOnce(&'a Self) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let client = self.enter().await?;
        let result = body(client).await;
        self.exit().await;
        result
    }

    /// Current lifecycle state.
    fn state(&self) -> LifecycleState {
        self.lifecycle().state()
    }
}

/// [`ApiClient`] over [`ReqwestTransport`].
///
/// ## Examples
///
/// ```rust,ignore
/// use api_method::client::{ApiClient, ClientConfig, RestClient};
///
/// let client = RestClient::new(ClientConfig::from_env()?);
/// let info = client
///     .scoped(|client| async move { client.execute(&GetClientInfo).await })
///     .await?;
/// ```
#[derive(Debug)]
pub struct RestClient {
    config: ClientConfig,
    lifecycle: Lifecycle<ReqwestTransport>,
}

impl RestClient {
    /// A client whose transport is built from `config` on first use.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(),
        }
    }

    /// A client whose transport comes from `factory` instead of `config`.
    pub fn with_factory(config: ClientConfig, factory: TransportFactory<ReqwestTransport>) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::with_factory(factory),
        }
    }

    /// The configuration the transport is built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl ApiClient for RestClient {
    type Transport = ReqwestTransport;

    fn lifecycle(&self) -> &Lifecycle<ReqwestTransport> {
        &self.lifecycle
    }

    fn create_transport(&self) -> BoxFuture<'_, Result<ReqwestTransport, ApiError>> {
        Box::pin(async move {
            let transport = ReqwestTransport::new(&self.config)?;
            tracing::debug!(base_url = ?self.config.base_url(), "reqwest transport created");
            Ok(transport)
        })
    }
}
