#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Connection teardown races: a result computed while the channel dies must
//! never reach the callback.

mod common;

use common::{first_request, AeadMechanism, RecordingCallback};
use sasl_channel::{
    ChannelGuard, ChannelMetrics, EventLoop, HandshakeCoordinator, InlinePool, WireEncoding,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn coordinator_with_metrics(
    guard: ChannelGuard,
) -> (HandshakeCoordinator, Arc<ChannelMetrics>) {
    let metrics = Arc::new(ChannelMetrics::new());
    let coordinator = HandshakeCoordinator::new(
        Box::new(AeadMechanism::new(1)),
        WireEncoding::Binary,
        Arc::new(InlinePool),
        guard,
    )
    .with_metrics(Arc::clone(&metrics));
    (coordinator, metrics)
}

#[test]
fn teardown_after_compute_before_delivery_invokes_nothing() {
    let (mut event_loop, handle) = EventLoop::new();
    let guard = ChannelGuard::new(handle);
    let (coordinator, _metrics) = coordinator_with_metrics(guard.clone());
    let callback = Arc::new(RecordingCallback::default());

    // InlinePool runs the worker step synchronously: by the time consume
    // returns, a successful reply sits in the event-loop queue.
    coordinator.consume(
        first_request(WireEncoding::Binary, "krb5", 1, b"hello").into(),
        callback.clone(),
    );

    // The channel dies before the event loop gets to run the delivery.
    guard.revoke();
    event_loop.drain();

    assert!(
        callback.take().is_empty(),
        "no callback method may run after teardown"
    );
}

#[test]
fn teardown_before_posting_drops_and_counts_the_result() {
    let (mut event_loop, handle) = EventLoop::new();
    let guard = ChannelGuard::new(handle);
    let (coordinator, metrics) = coordinator_with_metrics(guard.clone());
    let callback = Arc::new(RecordingCallback::default());

    // The channel is already gone when the worker finishes computing.
    guard.revoke();
    coordinator.consume(
        first_request(WireEncoding::Binary, "krb5", 1, b"hello").into(),
        callback.clone(),
    );

    assert_eq!(event_loop.drain(), 0);
    assert!(callback.take().is_empty());
    assert_eq!(metrics.stale_drops.load(Ordering::Relaxed), 1);
}

#[test]
fn live_channel_delivers_normally() {
    let (mut event_loop, handle) = EventLoop::new();
    let guard = ChannelGuard::new(handle);
    let (coordinator, metrics) = coordinator_with_metrics(guard);
    let callback = Arc::new(RecordingCallback::default());

    coordinator.consume(
        first_request(WireEncoding::Binary, "krb5", 1, b"hello").into(),
        callback.clone(),
    );
    event_loop.drain();

    assert_eq!(callback.take().len(), 2, "reply plus completion signal");
    assert_eq!(metrics.stale_drops.load(Ordering::Relaxed), 0);
    assert_eq!(metrics.handshakes_completed.load(Ordering::Relaxed), 1);
}
