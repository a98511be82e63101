//! Worker pool contract and the tokio-backed implementation.
//!
//! Handshake steps call into the security mechanism, which may block on
//! network or cryptographic I/O. They therefore never run on the event-loop
//! thread; the coordinator hands them to a [`WorkerPool`] as boxed jobs.

use crate::error::{constants, Result, SaslError};
use std::sync::Arc;
use tokio::sync::{Semaphore, TryAcquireError};
use tracing::debug;

/// A unit of possibly-blocking work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Accepts work for asynchronous execution off the calling thread.
///
/// Submission is fallible: a saturated or shut-down pool rejects the job,
/// and the caller reports that synchronously since nothing was scheduled.
pub trait WorkerPool: Send + Sync {
    fn submit(&self, job: Job) -> Result<()>;
}

/// Worker pool backed by tokio's blocking thread pool, with a
/// semaphore-bounded in-flight capacity.
///
/// Shared across connections; `close()` rejects all further submissions,
/// which is how shutdown surfaces as scheduling failures rather than lost
/// work.
pub struct BlockingPool {
    handle: tokio::runtime::Handle,
    permits: Arc<Semaphore>,
}

impl BlockingPool {
    /// Create a pool on the current tokio runtime.
    ///
    /// # Errors
    /// [`SaslError::Scheduling`] when called outside a runtime.
    pub fn new(capacity: usize) -> Result<Self> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| SaslError::Scheduling(format!("no tokio runtime available: {e}")))?;
        Ok(Self::with_handle(handle, capacity))
    }

    /// Create a pool on an explicit runtime handle.
    pub fn with_handle(handle: tokio::runtime::Handle, capacity: usize) -> Self {
        Self {
            handle,
            permits: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Reject all further submissions. In-flight jobs run to completion.
    pub fn close(&self) {
        self.permits.close();
    }
}

impl WorkerPool for BlockingPool {
    fn submit(&self, job: Job) -> Result<()> {
        let permit = match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                debug!("rejecting job: pool saturated");
                return Err(SaslError::Scheduling(constants::ERR_POOL_SATURATED.into()));
            }
            Err(TryAcquireError::Closed) => {
                return Err(SaslError::Scheduling(constants::ERR_POOL_CLOSED.into()));
            }
        };

        self.handle.spawn_blocking(move || {
            let _permit = permit;
            job();
        });
        Ok(())
    }
}

/// Runs each job synchronously on the submitting thread.
///
/// Useful for tests and single-threaded tools; a real deployment uses
/// [`BlockingPool`] so the event loop stays non-blocking.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlinePool;

impl WorkerPool for InlinePool {
    fn submit(&self, job: Job) -> Result<()> {
        job();
        Ok(())
    }
}
