//! Shared configuration types for fusebox
//!
//! This crate contains the serializable configuration shared between the
//! container library (fusebox-core) and the driver binary (fusebox-cli).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Container Config
// ─────────────────────────────────────────────────────────────────────────────

/// Storage limits for a fuse container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Slots reserved up front when the container is created
    #[serde(default)]
    pub initial_capacity: usize,
    /// Upper bound on live fuses (None = limited only by memory)
    #[serde(default)]
    pub max_fuses: Option<usize>,
}

impl ContainerConfig {
    /// Whether one more fuse fits next to `live` existing ones
    pub fn admits(&self, live: usize) -> bool {
        self.max_fuses.is_none_or(|max| live < max)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver Config
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for the external loop that drives `poll_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Delay between two polls of the whole container
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Emit an info line for every fired fuse
    #[serde(default = "default_true")]
    pub log_fired: bool,
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            log_fired: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseboxConfig {
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}
