//! Fuse container
//!
//! Owns every armed fuse and is the only thing that fires or disarms them.
//! Fuses live in one contiguous `Vec`, kept in insertion order. Ids are
//! assigned in increasing order and removal never reorders the survivors, so
//! the storage is always sorted by id and lookups are a binary search.
//!
//! Expiry is only ever noticed inside `poll`/`poll_all`; nothing runs in the
//! background.

use std::time::{Duration, Instant};

use fusebox_types::ContainerConfig;

use super::clock::{Clock, SystemClock};
use super::fuse::{Fuse, FuseBuilder, FuseId, PollStatus};
use crate::error::{FuseError, Result};

/// A collection of armed one-shot timed callbacks.
///
/// Callbacks run synchronously on the polling thread. Polling borrows the
/// container mutably for the whole call, so a callback cannot reach back into
/// the container that is firing it. When the container sits behind a
/// `RefCell`, a callback that tries anyway hits a borrow error instead of
/// observing half-updated storage.
pub struct FuseContainer<P, C = SystemClock> {
    fuses: Vec<Fuse<P>>,
    clock: C,
    config: ContainerConfig,
    next_id: u64,
}

impl<P> FuseContainer<P> {
    /// Empty container on the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<P> Default for FuseContainer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, C: Clock> FuseContainer<P, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            fuses: Vec::new(),
            clock,
            config: ContainerConfig::default(),
            next_id: 0,
        }
    }

    /// Empty container with storage reserved per `config`
    pub fn with_config(config: ContainerConfig, clock: C) -> Result<Self> {
        let mut fuses = Vec::new();
        fuses.try_reserve_exact(config.initial_capacity)?;
        Ok(Self {
            fuses,
            clock,
            config,
            next_id: 0,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of live fuses
    pub fn len(&self) -> usize {
        self.fuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuses.is_empty()
    }

    /// Slots available without reallocating
    pub fn capacity(&self) -> usize {
        self.fuses.capacity()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current position of a live fuse. Positions shift when an earlier
    /// fuse leaves the container; ids do not.
    pub fn position(&self, id: FuseId) -> Option<usize> {
        self.fuses.binary_search_by_key(&id, Fuse::id).ok()
    }

    pub fn contains(&self, id: FuseId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: FuseId) -> Option<&Fuse<P>> {
        self.position(id).map(|idx| &self.fuses[idx])
    }

    pub fn get_at(&self, index: usize) -> Option<&Fuse<P>> {
        self.fuses.get(index)
    }

    /// Live fuses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Fuse<P>> {
        self.fuses.iter()
    }

    /// Earliest deadline among live fuses
    pub fn next_deadline(&self) -> Option<Instant> {
        self.fuses.iter().map(Fuse::deadline).min()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Arm a fuse that calls `on_expire(payload)` once `duration` has passed
    pub fn add(
        &mut self,
        payload: P,
        duration: Duration,
        on_expire: impl FnOnce(P) + 'static,
    ) -> Result<FuseId> {
        self.insert(
            FuseBuilder::new()
                .payload(payload)
                .duration(duration)
                .on_expire(on_expire),
        )
    }

    /// `add` with a duration in whole seconds
    pub fn add_secs(
        &mut self,
        payload: P,
        secs: u64,
        on_expire: impl FnOnce(P) + 'static,
    ) -> Result<FuseId> {
        self.add(payload, Duration::from_secs(secs), on_expire)
    }

    /// Arm a fuse described by a builder
    pub fn insert(&mut self, builder: FuseBuilder<P>) -> Result<FuseId> {
        if !self.config.admits(self.fuses.len()) {
            let max = self.config.max_fuses.unwrap_or(self.fuses.len());
            tracing::warn!(max, "fuse rejected: container full");
            return Err(FuseError::CapacityExceeded { max });
        }
        self.fuses.try_reserve(1)?;

        let id = FuseId(self.next_id);
        let fuse = builder.build(id, self.clock.now())?;
        self.next_id += 1;

        tracing::debug!(
            fuse = %id,
            label = fuse.label(),
            duration = ?fuse.duration(),
            live = self.fuses.len() + 1,
            "fuse armed"
        );
        self.fuses.push(fuse);
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Removal
    // ─────────────────────────────────────────────────────────────────────────

    /// Disarm a fuse without firing it, handing its payload back
    pub fn remove(&mut self, id: FuseId) -> Result<P> {
        let idx = self.position(id).ok_or(FuseError::NotFound { id })?;
        Ok(self.disarm_at(idx))
    }

    /// Disarm the fuse at `index`. Every later fuse moves down one position.
    pub fn remove_at(&mut self, index: usize) -> Result<P> {
        if index >= self.fuses.len() {
            return Err(FuseError::OutOfRange {
                index,
                len: self.fuses.len(),
            });
        }
        Ok(self.disarm_at(index))
    }

    fn disarm_at(&mut self, idx: usize) -> P {
        let fuse = self.fuses.remove(idx);
        tracing::debug!(fuse = %fuse.id(), live = self.fuses.len(), "fuse disarmed");
        fuse.disarm()
    }

    /// Disarm every fuse; no callback runs
    pub fn clear(&mut self) {
        let dropped = self.fuses.len();
        self.fuses.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "fuse container cleared");
        }
    }

    /// Clear and release the container
    pub fn close(mut self) {
        self.clear();
    }

    /// Close the container held in `handle`, leaving `None` behind.
    /// Closing an already-empty handle does nothing.
    pub fn close_handle(handle: &mut Option<Self>) {
        if let Some(container) = handle.take() {
            container.close();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Polling
    // ─────────────────────────────────────────────────────────────────────────

    /// Fire one fuse if its deadline has passed.
    ///
    /// The fuse leaves the container before its callback runs.
    pub fn poll(&mut self, id: FuseId) -> Result<PollStatus> {
        let idx = self.position(id).ok_or(FuseError::NotFound { id })?;
        let now = self.clock.now();

        let fuse = &self.fuses[idx];
        if !fuse.is_expired(now) {
            let remaining = fuse.remaining(now);
            tracing::trace!(fuse = %id, ?remaining, "fuse pending");
            return Ok(PollStatus::Pending { remaining });
        }

        let fuse = self.fuses.remove(idx);
        tracing::debug!(fuse = %id, live = self.fuses.len(), "fuse fired");
        fuse.fire();
        Ok(PollStatus::Fired)
    }

    /// Fire every fuse whose deadline has passed. Returns how many fired.
    ///
    /// Expiry is judged against a single reading of the clock. Survivors are
    /// compacted to the front of the existing storage, keeping their relative
    /// order and the reserved capacity; only then do callbacks run, in
    /// insertion order. If a callback panics, the expired fuses that had not
    /// fired yet go back into the container still armed.
    pub fn poll_all(&mut self) -> usize {
        let now = self.clock.now();
        tracing::trace!(live = self.fuses.len(), "polling all fuses");

        let mut kept = 0;
        for idx in 0..self.fuses.len() {
            if !self.fuses[idx].is_expired(now) {
                self.fuses.swap(kept, idx);
                kept += 1;
            }
        }
        if kept == self.fuses.len() {
            return 0;
        }

        // The swaps shuffle the expired tail; ids restore insertion order.
        let mut expired = self.fuses.split_off(kept);
        expired.sort_unstable_by_key(Fuse::id);

        let fired = expired.len();
        tracing::debug!(fired, live = self.fuses.len(), "fuses expired");

        let mut pending = Unfired {
            live: &mut self.fuses,
            rest: expired.into_iter(),
        };
        while let Some(fuse) = pending.rest.next() {
            tracing::trace!(fuse = %fuse.id(), "fuse fired");
            fuse.fire();
        }
        fired
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reset
    // ─────────────────────────────────────────────────────────────────────────

    /// Restart one fuse's countdown from now
    pub fn reset(&mut self, id: FuseId) -> Result<()> {
        let idx = self.position(id).ok_or(FuseError::NotFound { id })?;
        let now = self.clock.now();
        self.fuses[idx].rearm(now)?;
        tracing::debug!(fuse = %id, "fuse reset");
        Ok(())
    }

    /// Restart every countdown from a single reading of the clock.
    /// A fuse whose new deadline would overflow the clock keeps its old one.
    pub fn reset_all(&mut self) {
        let now = self.clock.now();
        for fuse in &mut self.fuses {
            if let Err(err) = fuse.rearm(now) {
                tracing::warn!(fuse = %fuse.id(), %err, "fuse kept previous deadline");
            }
        }
        tracing::debug!(live = self.fuses.len(), "all fuses reset");
    }
}

/// Expired fuses still waiting for their callback during `poll_all`.
/// Whatever has not fired when this drops (a callback panicked) goes back
/// into the container untouched, in id order.
struct Unfired<'a, P> {
    live: &'a mut Vec<Fuse<P>>,
    rest: std::vec::IntoIter<Fuse<P>>,
}

impl<P> Drop for Unfired<'_, P> {
    fn drop(&mut self) {
        if self.rest.len() == 0 {
            return;
        }
        tracing::warn!(unfired = self.rest.len(), "fuse callback panicked");
        self.live.extend(self.rest.by_ref());
        self.live.sort_unstable_by_key(Fuse::id);
    }
}
