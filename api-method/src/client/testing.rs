//! In-memory transport for exercising clients without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::transport::{BoxFuture, Transport};
use crate::error::TransportError;
use crate::request::Request;
use crate::response::HttpResponse;

/// Creation, shutdown and send counts shared between a test and its stubs.
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    created: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
    sent: Arc<AtomicUsize>,
}

impl Counters {
    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub(crate) fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

/// Replays queued responses and records the requests it was given.
#[derive(Debug)]
pub(crate) struct StubTransport {
    counters: Counters,
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<Request>>,
}

impl StubTransport {
    pub(crate) fn new(counters: &Counters) -> Self {
        counters.created.fetch_add(1, Ordering::SeqCst);
        Self {
            counters: counters.clone(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn respond_with(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    fn send<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            self.counters.sent.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let next = self.responses.lock().unwrap().pop_front();
            Ok(next.unwrap_or_else(|| HttpResponse::new(204, bytes::Bytes::new())))
        })
    }

    fn shutdown(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        })
    }
}
