pub mod config;
pub mod error;
pub mod fuses;

pub use config::{ContainerConfig, DriverConfig, FuseboxConfig, FuseboxConfigExt};
pub use error::{ConfigError, FuseError, Result};
pub use fuses::{
    Clock, ExpireFn, Fuse, FuseBuilder, FuseContainer, FuseId, ManualClock, PollStatus,
    SystemClock,
};
