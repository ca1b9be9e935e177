//! Host-loop integration.
//!
//! A [`TickSource`] is whatever periodic scheduler the host runs. The
//! [`TickDriver`] installs a single callback into it that ticks a
//! [`TickTarget`] (normally a [`PoolContext`](crate::PoolContext)) and
//! removes it again, with a full teardown, when the session ends.

mod driver;
mod error;
mod source;

pub use driver::{TickDriver, TickTarget};
pub use error::TickDriverError;
pub use source::{TickCallback, TickHandle, TickLoop, TickSource};
