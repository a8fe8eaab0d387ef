//! Error types for fuse container operations

use std::collections::TryReserveError;
use thiserror::Error;

use crate::fuses::FuseId;

/// Errors from single-fuse operations (`add`, `remove`, `poll`, `reset`).
///
/// None of these leave the container modified; the caller may retry or ignore.
#[derive(Debug, Error)]
pub enum FuseError {
    #[error("invalid fuse argument: {reason}")]
    InvalidArgument { reason: &'static str },

    #[error("fuse {id} is not live")]
    NotFound { id: FuseId },

    #[error("fuse index {index} out of range (live fuses: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("failed to grow fuse storage")]
    AllocationFailure(#[from] TryReserveError),

    #[error("fuse limit reached ({max})")]
    CapacityExceeded { max: usize },
}

pub type Result<T, E = FuseError> = std::result::Result<T, E>;

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to locate configuration file")]
    Locate(#[source] confy::ConfyError),
}
