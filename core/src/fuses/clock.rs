//! Time sources for fuse expiry
//!
//! The container never reads the wall clock itself; it asks a [`Clock`].
//! Production code uses [`SystemClock`]. Tests and replay tooling use
//! [`ManualClock`], which only moves when told to.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Supplies the current time to a fuse container
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Monotonic OS clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Caller-driven clock.
///
/// Clones share the same timeline, so a test can hand one clone to the
/// container and keep another to advance time:
///
/// ```
/// use std::time::Duration;
/// use fusebox_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// let start = clock.now();
/// handle.advance(Duration::from_secs(5));
/// assert_eq!(clock.now() - start, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Move time forward by `by`, saturating at the last instant the
    /// platform can represent
    pub fn advance(&self, by: Duration) {
        self.set_elapsed(self.elapsed.get().saturating_add(by));
    }

    /// Move time forward by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Jump to an absolute offset from the clock's origin.
    /// Moving backwards is ignored; the clock is monotonic.
    pub fn set_elapsed(&self, elapsed: Duration) {
        if elapsed > self.elapsed.get() {
            self.elapsed.set(self.representable(elapsed));
        }
    }

    /// Largest offset not past `wanted` that `origin` can still be shifted by
    fn representable(&self, wanted: Duration) -> Duration {
        if self.origin.checked_add(wanted).is_some() {
            return wanted;
        }
        // Binary search between the current offset and `wanted`.
        let (mut lo, mut hi) = (self.elapsed.get(), wanted);
        while hi - lo > Duration::from_nanos(1) {
            let mid = lo + (hi - lo) / 2;
            if self.origin.checked_add(mid).is_some() {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Time passed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
