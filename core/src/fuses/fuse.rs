//! Armed fuse records
//!
//! A `Fuse` is one one-shot timed callback. It owns its payload until the
//! callback consumes it (on expiry) or until it is disarmed, in which case
//! the payload is handed back to whoever disarmed it.
//!
//! # Lifecycle
//!
//! 1. `FuseBuilder` validated → `Fuse` armed at the container's current time
//! 2. `reset` re-arms it at a later time (duration and payload untouched)
//! 3. Either the deadline passes and a poll fires it, or it is disarmed

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{FuseError, Result};

/// Callback invoked with the payload when a fuse expires
pub type ExpireFn<P> = Box<dyn FnOnce(P)>;

/// Stable identity of a fuse within its container.
///
/// Ids are handed out in increasing order and never reused, so an id that
/// outlived its fuse fails with `NotFound` instead of reaching a newer fuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuseId(pub(crate) u64);

impl FuseId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FuseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of polling a single fuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// The callback ran and the fuse is gone
    Fired,
    /// Still armed; `remaining` is the time left before it may fire
    Pending { remaining: Duration },
}

impl PollStatus {
    pub fn fired(&self) -> bool {
        matches!(self, PollStatus::Fired)
    }
}

/// An armed fuse
pub struct Fuse<P> {
    id: FuseId,
    label: Option<String>,
    payload: P,
    armed_at: Instant,
    deadline: Instant,
    duration: Duration,
    on_expire: ExpireFn<P>,
}

impl<P> Fuse<P> {
    pub fn id(&self) -> FuseId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// When the fuse was created or last reset
    pub fn armed_at(&self) -> Instant {
        self.armed_at
    }

    /// Earliest instant at which a poll fires this fuse
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Re-arm at `now`, keeping duration and payload
    pub(crate) fn rearm(&mut self, now: Instant) -> Result<()> {
        self.deadline = deadline_for(now, self.duration)?;
        self.armed_at = now;
        Ok(())
    }

    /// Run the callback, consuming the fuse
    pub(crate) fn fire(self) {
        (self.on_expire)(self.payload);
    }

    /// Drop the callback unrun and hand the payload back
    pub(crate) fn disarm(self) -> P {
        self.payload
    }
}

impl<P: fmt::Debug> fmt::Debug for Fuse<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fuse")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("payload", &self.payload)
            .field("armed_at", &self.armed_at)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

fn deadline_for(now: Instant, duration: Duration) -> Result<Instant> {
    now.checked_add(duration).ok_or(FuseError::InvalidArgument {
        reason: "duration overflows the clock",
    })
}

/// Collects the parts of a fuse before it is armed.
///
/// Payload and callback are both required; `build` reports whichever is
/// missing as `InvalidArgument`.
pub struct FuseBuilder<P> {
    label: Option<String>,
    payload: Option<P>,
    duration: Duration,
    on_expire: Option<ExpireFn<P>>,
}

impl<P> Default for FuseBuilder<P> {
    fn default() -> Self {
        Self {
            label: None,
            payload: None,
            duration: Duration::ZERO,
            on_expire: None,
        }
    }
}

impl<P> FuseBuilder<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn duration_secs(self, secs: u64) -> Self {
        self.duration(Duration::from_secs(secs))
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn on_expire(mut self, on_expire: impl FnOnce(P) + 'static) -> Self {
        self.on_expire = Some(Box::new(on_expire));
        self
    }

    /// Arm the fuse at `now` under identity `id`
    pub(crate) fn build(self, id: FuseId, now: Instant) -> Result<Fuse<P>> {
        let payload = self.payload.ok_or(FuseError::InvalidArgument {
            reason: "missing payload",
        })?;
        let on_expire = self.on_expire.ok_or(FuseError::InvalidArgument {
            reason: "missing expiry callback",
        })?;
        let deadline = deadline_for(now, self.duration)?;

        Ok(Fuse {
            id,
            label: self.label,
            payload,
            armed_at: now,
            deadline,
            duration: self.duration,
            on_expire,
        })
    }
}
