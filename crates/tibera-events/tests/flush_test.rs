//! Flush scheduling: backoff growth and reset, single-flight delivery,
//! lifecycle notifications, and the observable flush phase.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;

use test_fixtures::{event_types, memory_queue, payload_ns, RecordingTransport};
use tibera_core::config::EventsConfig;
use tibera_core::EmitOptions;
use tibera_events::{DurableEventQueue, FlushPhase, QueueSettings};
use tibera_storage::MemoryStore;

fn emit_n(queue: &DurableEventQueue, range: std::ops::RangeInclusive<u64>) {
    for n in range {
        queue.emit("counter.tick", json!({ "n": n }), EmitOptions::default());
    }
}

#[tokio::test(start_paused = true)]
async fn backoff_grows_to_cap_against_failing_endpoint() {
    let transport = RecordingTransport::failing();
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=3);
    assert_eq!(queue.backoff(), Duration::from_millis(400));

    let mut observed = Vec::new();
    for _ in 0..12 {
        queue.flush().await;
        observed.push(queue.backoff());
    }

    assert!(observed.windows(2).all(|w| w[0] <= w[1]));
    assert!(observed.iter().all(|d| *d <= Duration::from_secs(15)));
    assert_eq!(observed.last(), Some(&Duration::from_secs(15)));
    assert_eq!(observed[0], Duration::from_millis(640));
    assert_eq!(transport.attempts(), 12);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.metrics().batches_failed, 12);
}

#[tokio::test(start_paused = true)]
async fn success_resets_backoff() {
    let transport = RecordingTransport::failing();
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=1);

    for _ in 0..4 {
        queue.flush().await;
    }
    assert!(queue.backoff() > Duration::from_millis(400));

    transport.set_accept(true);
    queue.flush().await;

    assert_eq!(queue.backoff(), Duration::from_millis(400));
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_batch_is_retried_after_backoff() {
    let transport = RecordingTransport::failing();
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=2);

    // Debounce fires at 250ms and fails; the retry is armed for 640ms later.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(transport.attempts(), 1);
    assert_eq!(queue.phase(), FlushPhase::BackingOff);

    transport.set_accept(true);
    tokio::time::sleep(Duration::from_millis(700)).await;

    assert_eq!(payload_ns(&transport.delivered()), vec![1, 2]);
    assert_eq!(queue.phase(), FlushPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn zero_backoff_base_from_config_still_spaces_retries() {
    let config = EventsConfig {
        backoff_base_ms: 0,
        ..EventsConfig::default()
    };
    let settings = QueueSettings::from(&config);
    assert_eq!(settings.backoff.base(), Duration::from_millis(1));

    let transport = RecordingTransport::failing();
    let queue =
        DurableEventQueue::new(settings, Arc::new(MemoryStore::new()), transport.clone());
    emit_n(&queue, 1..=1);

    tokio::time::sleep(Duration::from_millis(750)).await;

    // Debounce at 250ms, then retries 2, 3, 5, 8, 13, 21, 34, 54, 86 and
    // 138ms apart fit in the remaining 500ms.
    assert!(transport.attempts() <= 12, "attempts = {}", transport.attempts());
    assert!(queue.backoff() > Duration::from_millis(100));
    assert_eq!(queue.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_triggers_never_overlap_sends() {
    let transport = RecordingTransport::accepting();
    transport.set_latency(Duration::from_millis(100));
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=60);

    tokio::join!(queue.flush(), queue.flush(), async { queue.notify_online() });
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(transport.max_in_flight(), 1);
    let sizes: Vec<usize> = transport.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![25, 25, 10]);
    assert_eq!(payload_ns(&transport.delivered()), (1..=60).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn eviction_during_inflight_batch_delivers_each_event_once() {
    let settings = QueueSettings {
        max_queue: 3,
        batch_size: 2,
        ..QueueSettings::default()
    };
    let transport = RecordingTransport::accepting();
    transport.set_latency(Duration::from_millis(100));
    let queue =
        DurableEventQueue::new(settings, Arc::new(MemoryStore::new()), transport.clone());

    for name in ["a", "b", "c"] {
        queue.emit(name, json!({}), EmitOptions::default());
    }
    queue.flush_soon();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queue.phase(), FlushPhase::Flushing);

    // [a, b] is in flight; these two push it out of the queue.
    queue.emit("d", json!({}), EmitOptions::default());
    queue.emit("e", json!({}), EmitOptions::default());
    assert_eq!(event_types(&queue.snapshot()), vec!["c", "d", "e"]);

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(
        event_types(&transport.delivered()),
        vec!["a", "b", "c", "d", "e"]
    );
    assert!(queue.is_empty());
    let metrics = queue.metrics();
    assert_eq!(metrics.evicted, 2);
    // a and b were evicted locally but still acknowledged by the endpoint.
    assert_eq!(metrics.events_delivered, 5);
    assert_eq!(metrics.batches_sent, 3);
}

#[tokio::test(start_paused = true)]
async fn offline_holds_events_until_online() {
    let transport = RecordingTransport::accepting();
    let (queue, _store) = memory_queue(transport.clone());
    queue.init();
    queue.notify_offline();
    assert!(!queue.is_online());

    emit_n(&queue, 1..=2);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(transport.attempts(), 0);
    assert_eq!(queue.len(), 2);

    queue.notify_online();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(payload_ns(&transport.delivered()), vec![1, 2]);
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn lifecycle_signals_before_init_are_ignored() {
    let transport = RecordingTransport::accepting();
    let (queue, _store) = memory_queue(transport.clone());

    queue.notify_hidden();
    queue.notify_online();
    assert_eq!(queue.phase(), FlushPhase::Idle);
    assert!(!queue.is_initialized());

    queue.init();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(queue.phase(), FlushPhase::Idle);

    queue.notify_hidden();
    assert_eq!(queue.phase(), FlushPhase::Debounced);
}

#[tokio::test(start_paused = true)]
async fn hidden_flushes_without_waiting_for_debounce() {
    let transport = RecordingTransport::accepting();
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=1);

    queue.notify_hidden();
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(transport.batches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn phase_follows_flush_lifecycle() {
    let transport = RecordingTransport::failing();
    transport.set_latency(Duration::from_millis(100));
    let (queue, _store) = memory_queue(transport.clone());
    assert_eq!(queue.phase(), FlushPhase::Idle);

    emit_n(&queue, 1..=1);
    assert_eq!(queue.phase(), FlushPhase::Debounced);

    // Debounce fires at 250ms; the send takes until 350ms.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(queue.phase(), FlushPhase::Flushing);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.phase(), FlushPhase::BackingOff);
    assert_eq!(queue.phase().as_str(), "backing_off");
}

#[tokio::test(start_paused = true)]
async fn shutdown_delivers_immediately() {
    let transport = RecordingTransport::accepting();
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=5);

    queue.shutdown().await;

    assert_eq!(payload_ns(&transport.delivered()), vec![1, 2, 3, 4, 5]);
    assert!(queue.is_empty());
    assert_eq!(queue.phase(), FlushPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn shutdown_against_failing_endpoint_leaves_no_timer() {
    let transport = RecordingTransport::failing();
    let (queue, _store) = memory_queue(transport.clone());
    emit_n(&queue, 1..=2);

    queue.shutdown().await;

    assert_eq!(queue.phase(), FlushPhase::Idle);
    assert_eq!(queue.len(), 2);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.attempts(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn queue_holds_newest_events_up_to_capacity(capacity in 1usize..30, count in 0u64..90) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();
        let settings = QueueSettings { max_queue: capacity, ..QueueSettings::default() };

        let ns = runtime.block_on(async {
            let queue = DurableEventQueue::new(
                settings,
                Arc::new(MemoryStore::new()),
                RecordingTransport::failing(),
            );
            for n in 1..=count {
                queue.emit("counter.tick", json!({ "n": n }), EmitOptions::default());
            }
            payload_ns(&queue.snapshot())
        });

        let kept = (count as usize).min(capacity) as u64;
        let expected: Vec<u64> = (count - kept + 1..=count).collect();
        prop_assert_eq!(ns, expected);
    }
}
