//! Lazy, single-flight ownership of a client's transport.
//!
//! State machine: `Uninitialized -> Initializing -> Ready -> Closed`.
//! Creation happens on first use, under a lock held across the creation
//! await, so concurrent first calls still create exactly one transport.
//! Closing is idempotent and final.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::transport::{BoxFuture, Transport};
use crate::error::{ApiError, TransportError};

/// Observable state of a [`Lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No transport exists yet.
    Uninitialized,
    /// A transport is being created.
    Initializing,
    /// The transport is live.
    Ready,
    /// The transport was shut down; it is never recreated.
    Closed,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Initializing,
            2 => Self::Ready,
            3 => Self::Closed,
            _ => Self::Uninitialized,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Initializing => 1,
            Self::Ready => 2,
            Self::Closed => 3,
        }
    }
}

type SyncFactory<T> = Box<dyn Fn() -> Result<T, ApiError> + Send + Sync>;
type AsyncFactory<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// An injected way to create the transport, used instead of the client's
/// own creation hook.
pub enum TransportFactory<T> {
    /// Creates the transport synchronously.
    Sync(SyncFactory<T>),
    /// Creates the transport asynchronously.
    Async(AsyncFactory<T>),
}

impl<T> TransportFactory<T> {
    /// Wraps a synchronous constructor.
    pub fn sync(factory: impl Fn() -> Result<T, ApiError> + Send + Sync + 'static) -> Self {
        Self::Sync(Box::new(factory))
    }

    /// Wraps an asynchronous constructor.
    pub fn from_async<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self::Async(Box::new(move || Box::pin(factory())))
    }

    async fn create(&self) -> Result<T, ApiError> {
        match self {
            Self::Sync(factory) => factory(),
            Self::Async(factory) => factory().await,
        }
    }
}

impl<T> std::fmt::Debug for TransportFactory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("TransportFactory::Sync"),
            Self::Async(_) => f.write_str("TransportFactory::Async"),
        }
    }
}

enum Slot<T> {
    Empty,
    Ready(Arc<T>),
    Closed,
}

/// Owns at most one transport for the life of a client.
pub struct Lifecycle<T> {
    slot: Mutex<Slot<T>>,
    state: AtomicU8,
    factory: Option<TransportFactory<T>>,
}

impl<T: Transport> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Lifecycle<T> {
    /// A lifecycle that creates its transport through the client's hook.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            state: AtomicU8::new(LifecycleState::Uninitialized.as_u8()),
            factory: None,
        }
    }

    /// A lifecycle that creates its transport with `factory`.
    pub fn with_factory(factory: TransportFactory<T>) -> Self {
        let mut lifecycle = Self::new();
        lifecycle.factory = Some(factory);
        lifecycle
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Returns the live transport, creating it first if needed.
    ///
    /// The injected factory is preferred; `hook` is only called when there
    /// is none. A failed creation leaves the lifecycle `Uninitialized`.
    ///
    /// ## Errors
    ///
    /// - [`TransportError::Closed`] once [`close`](Self::close) has run
    /// - whatever the factory or hook returns
    pub async fn ensure_ready<F, Fut>(&self, hook: F) -> Result<Arc<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut slot = self.slot.lock().await;

        match &*slot {
            Slot::Ready(transport) => return Ok(Arc::clone(transport)),
            Slot::Closed => return Err(TransportError::Closed.into()),
            Slot::Empty => {}
        }

        self.set_state(LifecycleState::Initializing);
        let mut pending = PendingCreation {
            state: &self.state,
            armed: true,
        };
        let created = match &self.factory {
            Some(factory) => factory.create().await,
            None => hook().await,
        };
        pending.armed = false;

        match created {
            Ok(transport) => {
                let transport = Arc::new(transport);
                *slot = Slot::Ready(Arc::clone(&transport));
                self.set_state(LifecycleState::Ready);
                tracing::debug!(injected = self.factory.is_some(), "transport created");
                Ok(transport)
            }
            Err(err) => {
                self.set_state(LifecycleState::Uninitialized);
                tracing::warn!(error = %err, "transport creation failed");
                Err(err)
            }
        }
    }

    /// Shuts the transport down.
    ///
    /// A no-op when nothing was created or when already closed; the
    /// transport's `shutdown` runs at most once.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;

        match std::mem::replace(&mut *slot, Slot::Empty) {
            Slot::Ready(transport) => {
                *slot = Slot::Closed;
                self.set_state(LifecycleState::Closed);
                transport.shutdown().await;
                tracing::debug!("transport closed");
            }
            Slot::Closed => *slot = Slot::Closed,
            Slot::Empty => {}
        }
    }
}

/// Rolls the state back to `Uninitialized` if creation is cancelled
/// mid-await.
struct PendingCreation<'a> {
    state: &'a AtomicU8,
    armed: bool,
}

impl Drop for PendingCreation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state
                .store(LifecycleState::Uninitialized.as_u8(), Ordering::Release);
            tracing::debug!("transport creation cancelled");
        }
    }
}

impl<T> Drop for Lifecycle<T> {
    fn drop(&mut self) {
        if LifecycleState::from_u8(*self.state.get_mut()) == LifecycleState::Ready {
            tracing::warn!("client dropped without close(); use scoped() or call close()");
        }
    }
}

impl<T> std::fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field(
                "state",
                &LifecycleState::from_u8(self.state.load(Ordering::Acquire)),
            )
            .field("factory", &self.factory)
            .finish()
    }
}
