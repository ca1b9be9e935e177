//! Work deferred to future ticks: delayed releases and budgeted warm-up.

mod deferred;
mod warmup;

pub use deferred::{DeferredReleases, Drained, PendingRelease};
pub use warmup::{WarmupScheduler, WarmupStep, WarmupTask};
