//! Respawn Metrics - pool counters and tick timing
//!
//! Instrumentation for the pooling engine that completely vanishes in
//! production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use respawn_metrics::{PoolEvent, PoolStats, TickTimer};
//!
//! let mut stats = PoolStats::new();
//! stats.record(PoolEvent::Created, 1);
//!
//! let mut timer = TickTimer::new(60); // Track last 60 ticks
//! timer.begin();
//! // ... drain queues ...
//! timer.end();
//! println!("tick: {:.3}ms", timer.average_ms());
//! ```
//!
//! Without the `metrics` feature every call compiles to nothing and every
//! query returns zero.

#[cfg(feature = "metrics")]
mod pool_stats;
#[cfg(feature = "metrics")]
mod tick_timer;

#[cfg(feature = "metrics")]
pub use pool_stats::PoolStats;
#[cfg(feature = "metrics")]
pub use tick_timer::TickTimer;

/// Pool lifecycle events that are counted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PoolEvent {
    /// A pool instantiated a brand new instance.
    Created,
    /// A pool handed out a previously released instance.
    Recycled,
    /// An instance was parked back into its pool.
    Released,
    /// A live instance with no owning pool was destroyed on release.
    DestroyedUntracked,
    /// A delayed release came due and was processed.
    DeferredReleased,
    /// An instance was created by warm-up (sync or per tick).
    Warmed,
}

impl PoolEvent {
    pub const COUNT: usize = 6;

    pub const ALL: [PoolEvent; Self::COUNT] = [
        PoolEvent::Created,
        PoolEvent::Recycled,
        PoolEvent::Released,
        PoolEvent::DestroyedUntracked,
        PoolEvent::DeferredReleased,
        PoolEvent::Warmed,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PoolEvent::Created => "created",
            PoolEvent::Recycled => "recycled",
            PoolEvent::Released => "released",
            PoolEvent::DestroyedUntracked => "destroyed_untracked",
            PoolEvent::DeferredReleased => "deferred_released",
            PoolEvent::Warmed => "warmed",
        }
    }
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone)]
pub struct PoolStats;

#[cfg(not(feature = "metrics"))]
impl PoolStats {
    pub fn new() -> Self { Self }
    pub fn record(&mut self, _event: PoolEvent, _count: u64) {}
    pub fn get(&self, _event: PoolEvent) -> u64 { 0 }
    pub fn reset(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
pub struct TickTimer;

#[cfg(not(feature = "metrics"))]
impl TickTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn average_ms(&self) -> f64 { 0.0 }
    pub fn worst_ms(&self) -> f64 { 0.0 }
}
