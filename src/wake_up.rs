//! Out-of-band request for an extra tick.
//!
//! A composite that wants the driver to re-enter the tree before the next
//! scheduled poll calls [`WakeUpSignal::emit`]. The signal is a single pending
//! flag, so any number of emissions before the driver looks at it collapse
//! into one extra tick. Nobody listening is fine; the flag just stays set.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Clone, Default, Debug)]
pub struct WakeUpSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl WakeUpSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool, a panicking holder cannot leave it torn.
        self.inner
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks a wake-up as pending and wakes any thread in [`Self::wait_for`].
    pub fn emit(&self) {
        *self.pending() = true;
        self.inner.1.notify_all();
    }

    /// Returns whether a wake-up is pending without consuming it.
    pub fn is_pending(&self) -> bool {
        *self.pending()
    }

    /// Consumes a pending wake-up, returning whether there was one.
    pub fn take(&self) -> bool {
        std::mem::replace(&mut *self.pending(), false)
    }

    /// Blocks until a wake-up is emitted or `timeout` elapses, then consumes
    /// the signal. Returns `true` if woken by a signal.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let guard = self.pending();
        let (mut guard, _) = self
            .inner
            .1
            .wait_timeout_while(guard, timeout, |pending| !*pending)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, false)
    }
}
