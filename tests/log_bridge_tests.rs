//! Integration tests for the log bridge
//!
//! These tests wire a `GuiLogLayer` into a scoped subscriber and route its
//! sink into a `LogBuffer`, the same way the window controller does.

use spinshell::logging::{GuiLogLayer, LogBridge, LogBuffer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;

fn attach_buffer(bridge: &LogBridge, capacity: usize) -> Arc<Mutex<LogBuffer>> {
    let buffer = Arc::new(Mutex::new(LogBuffer::new(capacity)));
    let sink_buffer = buffer.clone();
    bridge
        .attach(Arc::new(move |line| sink_buffer.lock().unwrap().push(line)))
        .unwrap();
    buffer
}

#[test]
fn test_lines_appear_in_emission_order() {
    let bridge = LogBridge::new();
    let buffer = attach_buffer(&bridge, 100);
    let subscriber = tracing_subscriber::registry().with(GuiLogLayer::new(bridge.clone()));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("System started!");
        tracing::debug!("not shown");
        tracing::warn!("Program Killed!");
        tracing::info!("Initial Data Loaded");
    });

    assert_eq!(
        buffer.lock().unwrap().snapshot(),
        [
            "[INFO] System started!",
            "[WARNING] Program Killed!",
            "[INFO] Initial Data Loaded",
        ]
    );
}

#[test]
fn test_buffer_never_exceeds_capacity() {
    let bridge = LogBridge::new();
    let buffer = attach_buffer(&bridge, 10);
    let subscriber = tracing_subscriber::registry().with(GuiLogLayer::new(bridge.clone()));

    tracing::subscriber::with_default(subscriber, || {
        for i in 0..25 {
            tracing::info!("line {}", i);
        }
    });

    let buffer = buffer.lock().unwrap();
    assert_eq!(buffer.len(), 10);
    assert_eq!(buffer.iter().next(), Some("[INFO] line 15"));
    assert_eq!(buffer.iter().last(), Some("[INFO] line 24"));
}

#[test]
fn test_nothing_forwarded_after_teardown() {
    let bridge = LogBridge::new();
    let buffer = attach_buffer(&bridge, 100);
    let subscriber = tracing_subscriber::registry().with(GuiLogLayer::new(bridge.clone()));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("before");
        assert!(bridge.detach());
        tracing::error!("after");
    });

    // Direct calls are a no-op as well
    bridge.forward("[INFO] manual".to_string());

    assert_eq!(buffer.lock().unwrap().snapshot(), ["[INFO] before"]);
    assert!(!bridge.is_attached());
}

#[test]
fn test_reattach_after_detach() {
    let bridge = LogBridge::new();
    let first = attach_buffer(&bridge, 10);
    bridge.detach();
    let second = attach_buffer(&bridge, 10);

    bridge.forward("[INFO] hello".to_string());

    assert!(first.lock().unwrap().is_empty());
    assert_eq!(second.lock().unwrap().snapshot(), ["[INFO] hello"]);
}

#[test]
fn test_sink_may_call_back_into_bridge() {
    let bridge = LogBridge::new();
    let buffer = Arc::new(Mutex::new(LogBuffer::new(10)));

    let inner = bridge.clone();
    let sink_buffer = buffer.clone();
    let nested = Arc::new(AtomicBool::new(false));
    bridge
        .attach(Arc::new(move |line| {
            sink_buffer.lock().unwrap().push(line);
            // Same path a UI hand-off takes when it logs at INFO or above
            if inner.is_attached() && !nested.swap(true, Ordering::SeqCst) {
                inner.forward("[WARNING] from sink".to_string());
            }
        }))
        .unwrap();

    let (done_tx, done_rx) = mpsc::channel();
    let outer = bridge.clone();
    std::thread::spawn(move || {
        outer.forward("[INFO] outer".to_string());
        let _ = done_tx.send(());
    });

    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("forward blocked while the sink re-entered the bridge");

    assert_eq!(
        buffer.lock().unwrap().snapshot(),
        ["[INFO] outer", "[WARNING] from sink"]
    );
    bridge.detach();
}
