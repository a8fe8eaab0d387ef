//! Fuse system
//!
//! This module provides:
//! - **Clock**: The supplied time source expiry is judged against
//! - **Fuse**: One armed, one-shot timed callback and its identity
//! - **Container**: Owns armed fuses and fires or disarms them
//!
//! # Fuse States
//!
//! ```text
//!   add / insert
//!        │
//!        ▼
//!     Armed ──── reset ───┐
//!      │  │  ◄────────────┘
//!      │  └── remove / clear / close ──► Disarmed (payload returned or dropped)
//!      │
//!   poll at or after deadline
//!      │
//!      ▼
//!    Fired (callback consumed the payload)
//! ```

mod clock;
mod container;
mod fuse;


pub use clock::{Clock, ManualClock, SystemClock};
pub use container::FuseContainer;
pub use fuse::{ExpireFn, Fuse, FuseBuilder, FuseId, PollStatus};
