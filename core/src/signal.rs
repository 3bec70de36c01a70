//! Single-slot, loss-tolerant notification channels.
//!
//! A [`Signal`] holds at most one undelivered value. Posting while a value is
//! still unread replaces it, so a burst of notifications with nobody reading
//! leaves only the latest one behind. Signals are never closed: a signal that
//! nobody reads simply keeps its last value.
//!
//! A signal is not a queue. Controls post into a signal from the
//! dispatch loop without waiting for a consumer.

use core::fmt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::dispatch;

struct Slot<T> {
    value: Mutex<Option<T>>,
    ready: Condvar,
}

/// A single-slot channel shared by every clone.
pub struct Signal<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("pending", &self.has_value())
            .finish()
    }
}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T> Eq for Signal<T> {}

impl<T> Signal<T> {
    /// Creates an empty signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Slot {
                value: Mutex::new(None),
                ready: Condvar::new(),
            }),
        }
    }

    /// Stores `value`, replacing any unread value, and wakes readers.
    ///
    /// Never blocks on a consumer.
    pub fn post(&self, value: T) {
        let replaced = self.slot.value.lock().replace(value).is_some();
        if replaced {
            trace!("signal overwrote an unread value");
        }
        self.slot.ready.notify_all();
        dispatch::wake();
    }

    /// Takes the pending value, if any, without blocking.
    pub fn try_recv(&self) -> Option<T> {
        self.slot.value.lock().take()
    }

    /// Returns true if a value is waiting to be read.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.slot.value.lock().is_some()
    }

    /// Blocks until a value is available and takes it.
    ///
    /// On the UI thread this pumps the dispatch loop while waiting, so native
    /// events keep flowing. Elsewhere it parks the calling thread.
    pub fn recv(&self) -> T {
        if dispatch::is_ui_thread() {
            loop {
                if let Some(value) = self.try_recv() {
                    return value;
                }
                dispatch::pump(None);
            }
        }

        let mut slot = self.slot.value.lock();
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            self.slot.ready.wait(&mut slot);
        }
    }

    /// Like [`recv`](Self::recv), giving up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;

        if dispatch::is_ui_thread() {
            loop {
                if let Some(value) = self.try_recv() {
                    return Some(value);
                }
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return None;
                }
                dispatch::pump(Some(remaining));
            }
        }

        let mut slot = self.slot.value.lock();
        loop {
            if let Some(value) = slot.take() {
                return Some(value);
            }
            if self.slot.ready.wait_until(&mut slot, deadline).timed_out() {
                return slot.take();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn unread_value_is_overwritten() {
        let clicked = Signal::new();
        clicked.post(1);
        clicked.post(2);

        assert_eq!(clicked.try_recv(), Some(2));
        assert_eq!(clicked.try_recv(), None);
    }

    #[test]
    fn clones_share_one_slot() {
        let signal = Signal::new();
        let routed = signal.clone();
        routed.post("closing");

        assert!(signal.has_value());
        assert_eq!(signal, routed);
        assert_ne!(signal, Signal::new());
        assert_eq!(signal.try_recv(), Some("closing"));
        assert!(!routed.has_value());
    }

    #[test]
    fn recv_blocks_until_posted_from_another_thread() {
        let signal = Signal::new();
        let poster = signal.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            poster.post(42_u32);
        });

        assert_eq!(signal.recv(), 42);
        handle.join().expect("poster thread panicked");
    }

    #[test]
    fn recv_timeout_expires_without_value() {
        let signal: Signal<()> = Signal::new();
        assert_eq!(signal.recv_timeout(Duration::from_millis(10)), None);

        signal.post(());
        assert_eq!(signal.recv_timeout(Duration::from_millis(10)), Some(()));
    }
}
