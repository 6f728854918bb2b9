//! Run-wide cooperative shutdown flag.
//!
//! [`ShutdownSignal`] is set once by the coordinator and polled by every
//! simulator at its tick boundary. Setting it is idempotent and there is no
//! way to clear it.
//!
//! Besides the flag, the signal can interrupt a waiting simulator:
//! [`ShutdownSignal::wait_timeout`] parks on a channel whose only sender is
//! dropped by [`ShutdownSignal::set`], so sleepers wake as soon as the
//! signal fires instead of finishing their sleep.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
struct Inner {
    flag: AtomicBool,
    // Never sent on. Dropping it disconnects `parked`.
    wake: Mutex<Option<Sender<()>>>,
    parked: Receiver<()>,
}

/// Shared, clone-to-share shutdown flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (wake, parked) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                wake: Mutex::new(Some(wake)),
                parked,
            }),
        }
    }

    /// Request shutdown. Safe to call any number of times from any thread.
    pub fn set(&self) {
        if self.inner.flag.swap(true, Ordering::AcqRel) {
            return;
        }
        // A poisoned lock still holds the sender; take it either way.
        let mut wake = match self.inner.wake.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        wake.take();
    }

    /// Whether shutdown has been requested. Never blocks.
    pub fn is_set(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    /// Sleep for up to `timeout`, returning early when the signal is set.
    ///
    /// Returns `true` if shutdown was requested (before or during the wait).
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_set() {
            return true;
        }
        match self.inner.parked.recv_timeout(timeout) {
            Err(RecvTimeoutError::Disconnected) => true,
            _ => self.is_set(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_new_signal_is_clear() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_set());
    }

    #[test]
    fn test_set_is_idempotent_and_shared() {
        let signal = ShutdownSignal::new();
        let other = signal.clone();
        signal.set();
        signal.set();
        other.set();
        assert!(signal.is_set());
        assert!(other.is_set());
    }

    #[test]
    fn test_wait_times_out_when_not_set() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();
        assert!(!signal.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn test_wait_returns_immediately_when_already_set() {
        let signal = ShutdownSignal::new();
        signal.set();
        let start = Instant::now();
        assert!(signal.wait_timeout(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_set_wakes_waiting_thread() {
        let signal = ShutdownSignal::new();
        let waiter = signal.clone();
        let handle = std::thread::spawn(move || {
            let start = Instant::now();
            let woke = waiter.wait_timeout(Duration::from_secs(10));
            (woke, start.elapsed())
        });
        std::thread::sleep(Duration::from_millis(20));
        signal.set();
        let (woke, elapsed) = handle.join().unwrap();
        assert!(woke);
        assert!(elapsed < Duration::from_secs(2));
    }
}
