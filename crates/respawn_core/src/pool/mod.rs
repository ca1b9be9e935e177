//! Per-template instance pools and the registry that routes instances home.

mod instance_pool;
mod registry;

pub use instance_pool::{InstancePool, Origin};
pub use registry::{PoolRegistry, ReleaseOutcome};
