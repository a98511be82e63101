//! # Runtime Components
//!
//! The execution contracts the coordinator consumes: a worker pool for
//! blocking handshake work and a per-connection event loop that is the only
//! place allowed to touch the connection's callback.
//!
//! ## Components
//! - **WorkerPool**: submission of possibly-blocking jobs off the event-loop
//!   thread; submission may be rejected
//! - **EventLoop / EventLoopHandle**: single-threaded closure queue owned by
//!   a connection
//! - **ChannelGuard**: mutex-guarded liveness flag protecting every
//!   cross-thread delivery against connection teardown

pub mod event_loop;
pub mod worker;

pub use event_loop::{ChannelGuard, EventLoop, EventLoopHandle};
pub use worker::{BlockingPool, InlinePool, Job, WorkerPool};
