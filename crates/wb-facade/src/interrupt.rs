//! Cooperative interrupt token.
//!
//! The original design delivered cancellation by injecting an asynchronous
//! exception into the worker thread, which was only safe while the worker
//! was already suspended. [`Interrupt`] replaces that with an explicit token:
//! the orchestrator (or a signal handler) calls [`fire`](Interrupt::fire)
//! whenever it likes, and the facade observes it at its suspension point via
//! [`wait`](Interrupt::wait).

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// A cloneable one-shot cancellation token with a blocking wait.
///
/// Firing is idempotent and sticky: once fired, every current and future
/// [`wait`](Interrupt::wait) returns immediately.
///
/// # Examples
///
/// ```
/// use wb_facade::Interrupt;
///
/// let interrupt = Interrupt::new();
/// let handle = interrupt.clone();
///
/// let waiter = std::thread::spawn(move || interrupt.wait());
/// handle.fire();
/// waiter.join().unwrap();
/// assert!(handle.is_fired());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fired: Mutex<bool>,
    cond: Condvar,
}

impl Interrupt {
    /// Creates an unfired token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the token, waking every waiter.
    pub fn fire(&self) {
        let mut fired = self.inner.fired.lock();
        if !*fired {
            *fired = true;
            self.inner.cond.notify_all();
        }
    }

    /// `true` once [`fire`](Self::fire) has been called.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        *self.inner.fired.lock()
    }

    /// Blocks the calling thread until the token fires.
    ///
    /// Returns immediately if it already has.
    pub fn wait(&self) {
        let mut fired = self.inner.fired.lock();
        while !*fired {
            self.inner.cond.wait(&mut fired);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn wait_returns_immediately_when_already_fired() {
        let interrupt = Interrupt::new();
        interrupt.fire();
        interrupt.wait();
        assert!(interrupt.is_fired());
    }

    #[test]
    fn fire_is_idempotent() {
        let interrupt = Interrupt::new();
        interrupt.fire();
        interrupt.fire();
        assert!(interrupt.is_fired());
    }

    #[test]
    fn fire_wakes_a_blocked_waiter() {
        let interrupt = Interrupt::new();
        let waiter = {
            let interrupt = interrupt.clone();
            std::thread::spawn(move || interrupt.wait())
        };
        std::thread::sleep(Duration::from_millis(20));
        interrupt.fire();
        waiter.join().expect("waiter thread panicked");
    }

    #[test]
    fn clones_share_state() {
        let interrupt = Interrupt::new();
        let clone = interrupt.clone();
        clone.fire();
        assert!(interrupt.is_fired());
    }
}
