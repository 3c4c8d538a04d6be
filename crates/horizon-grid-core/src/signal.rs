//! Signals: synchronous multi-slot callbacks.
//!
//! Native toolkits deliver header clicks, editor activity and draw-time
//! formatting requests as callbacks. Horizon Grid models each such callback
//! source as a [`Signal`], and every handler the adapter layer installs is a
//! slot identified by a [`ConnectionId`].
//!
//! # Re-entrancy
//!
//! [`Signal::emit`] copies the slot list and drops its lock before calling
//! anything. A slot may connect to, disconnect from, or emit the signal it is
//! running on. Slots added during an emission first run on the next one.
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let edited = Signal::<(usize, String)>::new();
//! let id = edited.connect(|(row, text)| println!("row {row} now reads {text}"));
//!
//! edited.emit((3, "Hello".to_string()));
//! assert!(edited.disconnect(id));
//! assert!(!edited.disconnect(id));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Handle of one connected slot, used to disconnect it.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A callback source with any number of slots, called in connection order.
///
/// Use `()` as `Args` for argument-less notifications and a tuple for
/// several values.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.slots.lock().len())
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Creates a signal with no slots.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Adds a slot and returns its handle.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Removes a slot. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.slots.lock().remove(id).is_some();
        if removed {
            tracing::trace!(target: targets::SIGNAL, ?id, "slot disconnected");
        }
        removed
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Calls every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "horizon_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");
        for slot in slots {
            slot(&args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<usize>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = order.clone();
            signal.connect(move |&row| order.lock().push((tag, row)));
        }
        signal.emit(4);

        assert_eq!(*order.lock(), vec![("first", 4), ("second", 4)]);
    }

    #[test]
    fn test_disconnected_slot_is_not_called() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        let id = signal.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        signal.emit(());
        assert!(signal.disconnect(id));
        signal.emit(());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_can_disconnect_itself() {
        let signal = Arc::new(Signal::<()>::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let weak_signal = Arc::downgrade(&signal);
        let hits_clone = hits.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            if let (Some(signal), Some(id)) = (weak_signal.upgrade(), *own_id_clone.lock()) {
                signal.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_connected_during_emit_runs_next_time() {
        let signal = Arc::new(Signal::<()>::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let weak_signal = Arc::downgrade(&signal);
        let hits_clone = hits.clone();
        signal.connect(move |_| {
            if let Some(signal) = weak_signal.upgrade() {
                let hits = hits_clone.clone();
                signal.connect(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
