//! Integration tests for refresh signals.
//!
//! Tests cover: connect/send ordering, replacement by id, disconnect,
//! receivers that mutate the signal mid-send, and cross-thread sharing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use formstate_signals::{Refresh, Signal};

// ═════════════════════════════════════════════════════════════════════
// 1. Receivers run in connection order
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_receivers_called_in_order() {
    let signal: Signal<Refresh> = Signal::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for id in ["header", "body", "footer"] {
        let order = order.clone();
        signal.connect(
            id,
            Arc::new(move |_: &Refresh| order.lock().unwrap().push(id)),
        );
    }

    assert_eq!(signal.send(&Refresh), 3);
    assert_eq!(*order.lock().unwrap(), ["header", "body", "footer"]);
}

// ═════════════════════════════════════════════════════════════════════
// 2. Reconnecting an id replaces the receiver in place
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_reconnect_replaces_receiver() {
    let signal: Signal<u32> = Signal::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    signal.connect("a", Arc::new(move |n: &u32| s.lock().unwrap().push(("a1", *n))));
    let s = seen.clone();
    signal.connect("b", Arc::new(move |n: &u32| s.lock().unwrap().push(("b", *n))));
    let s = seen.clone();
    signal.connect("a", Arc::new(move |n: &u32| s.lock().unwrap().push(("a2", *n))));

    assert_eq!(signal.receiver_ids(), ["a", "b"]);
    signal.send(&7);
    assert_eq!(*seen.lock().unwrap(), [("a2", 7), ("b", 7)]);
}

// ═════════════════════════════════════════════════════════════════════
// 3. Disconnect
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_disconnect_stops_delivery() {
    let signal: Signal<Refresh> = Signal::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    signal.connect("view", Arc::new(move |_: &Refresh| {
        c.fetch_add(1, Ordering::SeqCst);
    }));

    signal.send(&Refresh);
    assert!(signal.disconnect("view"));
    assert!(!signal.disconnect("view"));
    assert_eq!(signal.send(&Refresh), 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// ═════════════════════════════════════════════════════════════════════
// 4. A receiver may disconnect itself while being called
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_receiver_disconnects_itself() {
    let signal: Arc<Signal<Refresh>> = Arc::new(Signal::new());
    let count = Arc::new(AtomicUsize::new(0));

    let sig = Arc::downgrade(&signal);
    let c = count.clone();
    signal.connect("once", Arc::new(move |_: &Refresh| {
        c.fetch_add(1, Ordering::SeqCst);
        if let Some(sig) = sig.upgrade() {
            sig.disconnect("once");
        }
    }));

    assert_eq!(signal.send(&Refresh), 1);
    assert_eq!(signal.send(&Refresh), 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// ═════════════════════════════════════════════════════════════════════
// 5. Signals are shareable across threads
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_send_from_many_threads() {
    let signal: Arc<Signal<Refresh>> = Arc::new(Signal::new());
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    signal.connect("counter", Arc::new(move |_: &Refresh| {
        c.fetch_add(1, Ordering::SeqCst);
    }));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let signal = signal.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    signal.send(&Refresh);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count.load(Ordering::SeqCst), 100);
}
