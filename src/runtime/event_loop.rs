//! Per-connection event loop and the teardown-safe posting guard.
//!
//! Each connection owns a single-threaded [`EventLoop`]; its handle lets any
//! thread post a closure to run there. The handle becomes invalid the moment
//! the owning channel is destroyed, so worker threads never hold one
//! directly. They hold a [`ChannelGuard`], which pairs the handle with a
//! liveness flag behind a mutex: the check-and-post step runs under the
//! lock, and the posted closure re-checks liveness immediately before
//! touching the callback, since teardown can land between the two.

use crate::runtime::worker::Job;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::trace;

/// Single-threaded task queue owned by one connection.
pub struct EventLoop {
    rx: mpsc::UnboundedReceiver<Job>,
}

/// Clonable sender posting closures onto the owning [`EventLoop`].
#[derive(Clone)]
pub struct EventLoopHandle {
    tx: mpsc::UnboundedSender<Job>,
}

impl EventLoop {
    /// Create a loop and its posting handle.
    pub fn new() -> (Self, EventLoopHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, EventLoopHandle { tx })
    }

    /// Drive the loop until every handle is dropped or revoked.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            task();
        }
        trace!("event loop drained, shutting down");
    }

    /// Run all currently-queued tasks on the calling thread.
    ///
    /// Deterministic alternative to [`Self::run`] for tests; returns the
    /// number of tasks executed.
    pub fn drain(&mut self) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            executed += 1;
        }
        executed
    }
}

impl EventLoopHandle {
    /// Post a closure to the owning loop. Returns false once the loop is
    /// gone.
    pub fn post(&self, job: Job) -> bool {
        self.tx.send(job).is_ok()
    }
}

/// Shared liveness flag for one connection's event loop.
///
/// Worker threads clone the guard into their jobs. Once `revoke()` runs (at
/// channel teardown), no thread can reach the event loop handle again and
/// in-flight results are silently discarded.
#[derive(Clone)]
pub struct ChannelGuard {
    inner: Arc<Mutex<Option<EventLoopHandle>>>,
}

impl ChannelGuard {
    pub fn new(handle: EventLoopHandle) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Whether the owning channel still exists.
    pub fn is_live(&self) -> bool {
        self.inner.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Mark the channel destroyed and drop the handle.
    pub fn revoke(&self) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = None;
        }
    }

    /// Check liveness and post `task` in one step.
    ///
    /// The lock is held only across the check-and-send; never across the
    /// task itself. The task is wrapped in a second liveness check because
    /// teardown may land after the send but before the loop runs it.
    /// Returns false when the task was not posted.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(slot) = self.inner.lock() else {
            return false;
        };
        let Some(handle) = slot.as_ref() else {
            return false;
        };

        let recheck = self.clone();
        handle.post(Box::new(move || {
            if recheck.is_live() {
                task();
            } else {
                trace!("channel revoked before delivery, dropping result");
            }
        }))
    }
}
