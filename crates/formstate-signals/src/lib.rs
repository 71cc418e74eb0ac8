//! # formstate-signals
//!
//! Signal dispatcher for the formstate crates. A form never talks to a UI
//! toolkit directly: it sends a [`Refresh`] on a [`Signal`] whenever state the
//! UI renders from has changed, and the binding layer connects a receiver that
//! schedules a redraw.
//!
//! ## Usage
//!
//! ```
//! use formstate_signals::{Refresh, Signal};
//! use std::sync::Arc;
//!
//! let signal: Signal<Refresh> = Signal::new();
//!
//! signal.connect("view", Arc::new(|_: &Refresh| {
//!     println!("redraw");
//! }));
//!
//! assert_eq!(signal.send(&Refresh), 1);
//! ```

use std::sync::{Arc, RwLock};

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that a signal can be shared with
/// whatever thread the UI binding runs its redraws on.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// The payload sent when the UI should redraw against a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Refresh;

/// A signal that can be connected to and dispatched.
///
/// Receivers are identified by a string id and called in the order they were
/// connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_ids())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub const fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// If a receiver with the same id is already connected, it is replaced in
    /// place and keeps its position in the call order.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().expect("signal lock poisoned");

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            tracing::trace!(receiver = %id, "signal receiver connected");
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given id.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// Receivers are called in connection order, outside the lock, so a
    /// receiver may connect or disconnect receivers. Returns the number of
    /// receivers called.
    pub fn send(&self, payload: &T) -> usize {
        let snapshot: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }

    /// Returns the ids of connected receivers in call order.
    pub fn receiver_ids(&self) -> Vec<String> {
        self.receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}
