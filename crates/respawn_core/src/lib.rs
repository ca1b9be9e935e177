//! Respawn Core
//!
//! Recycles runtime instances from per-template pools:
//! - Instance pools with lazy purging of externally destroyed instances
//! - A registry routing any instance back to its owning pool
//! - Time-deferred releases and tick-budgeted warm-up
//! - A tick driver that hooks the whole thing into a host loop
//!
//! Everything is single-threaded and cooperative. State lives in an explicit
//! [`PoolContext`] rather than a process-wide singleton.

pub mod config;
pub mod context;
pub mod host;
pub mod math;
pub mod pool;
pub mod schedule;
pub mod tick;
pub mod time;

pub use config::{PoolSettings, SettingsError};
pub use context::PoolContext;
pub use host::{Entity, Host, PrefabId, SceneWorld};
pub use math::Spatial;
pub use pool::{InstancePool, Origin, PoolRegistry, ReleaseOutcome};
pub use tick::{TickDriver, TickDriverError, TickHandle, TickLoop, TickSource, TickTarget};
pub use time::{Clock, SimulationTime, SystemClock};

pub use glam;
pub use respawn_metrics::{PoolEvent, PoolStats};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
