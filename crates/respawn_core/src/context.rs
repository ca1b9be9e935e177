//! Explicit pooling context.
//!
//! Owns the host, the clock, the registry and both tick-drained queues.
//! Application code calls `get`/`release`/`initialize` between ticks; the
//! [`TickDriver`](crate::TickDriver) calls [`PoolContext::tick`] once per
//! host tick. None of the pooling operations return errors: failures are
//! logged and absorbed.

use crate::config::PoolSettings;
use crate::host::Host;
use crate::pool::{Origin, PoolRegistry, ReleaseOutcome};
use crate::schedule::{DeferredReleases, WarmupScheduler};
use crate::tick::TickTarget;
use crate::time::Clock;
use respawn_metrics::{PoolEvent, PoolStats};
use std::time::Duration;
use tracing::{debug, trace, warn};

pub struct PoolContext<H: Host, C: Clock> {
    host: H,
    clock: C,
    settings: PoolSettings,
    registry: PoolRegistry<H>,
    deferred: DeferredReleases<H::Instance>,
    warmup: WarmupScheduler<H::Template>,
    stats: PoolStats,
    attached: bool,
}

impl<H: Host, C: Clock> PoolContext<H, C> {
    pub fn new(host: H, clock: C, settings: PoolSettings) -> Self {
        let registry = PoolRegistry::new(settings.pooled_name_suffix.clone());
        Self {
            host,
            clock,
            settings,
            registry,
            deferred: DeferredReleases::new(),
            warmup: WarmupScheduler::new(),
            stats: PoolStats::new(),
            attached: false,
        }
    }

    /// Acquire an active instance of `template`.
    ///
    /// Returns `None` (and creates no pool) if the template is not live.
    pub fn get(&mut self, template: H::Template) -> Option<H::Instance> {
        let (instance, origin) = self.registry.get(&mut self.host, template)?;
        match origin {
            Origin::Created => self.stats.record(PoolEvent::Created, 1),
            Origin::Recycled => self.stats.record(PoolEvent::Recycled, 1),
        }
        Some(instance)
    }

    /// Return `instance` to its pool now.
    pub fn release(&mut self, instance: H::Instance) -> ReleaseOutcome {
        let outcome = self.registry.release(&mut self.host, instance);
        match outcome {
            ReleaseOutcome::Pooled => self.stats.record(PoolEvent::Released, 1),
            ReleaseOutcome::DestroyedUntracked => self.stats.record(PoolEvent::DestroyedUntracked, 1),
            ReleaseOutcome::Ignored | ReleaseOutcome::Missing => {}
        }
        outcome
    }

    /// Return `instance` to its pool on the first tick at or after
    /// `now + delay`. A zero delay releases immediately. Delays past the end
    /// of the clock's range saturate, so `Duration::MAX` never comes due.
    pub fn release_after(&mut self, instance: H::Instance, delay: Duration) {
        if delay.is_zero() {
            self.release(instance);
            return;
        }
        let due = self.clock.now().saturating_add(delay);
        trace!(?instance, ?due, "scheduled deferred release");
        self.deferred.schedule(instance, due);
    }

    /// `get` followed by `release_after`.
    pub fn get_and_release(&mut self, template: H::Template, delay: Duration) -> Option<H::Instance> {
        let instance = self.get(template)?;
        self.release_after(instance, delay);
        Some(instance)
    }

    /// Ensure the pool for `template` owns at least `target` instances.
    ///
    /// With `per_tick_budget == 0` the pool is filled right now, which costs
    /// `target` instantiations inline. Otherwise a warm-up task is queued (or
    /// merged into an existing one) and at most `per_tick_budget` instances
    /// are created per tick.
    pub fn initialize(&mut self, template: H::Template, target: usize, per_tick_budget: usize) {
        if !self.host.is_template_live(template) {
            warn!(?template, "attempted to initialize a pool from a template that is not live");
            return;
        }
        if self.registry.count_all(template) >= target {
            return;
        }

        if per_tick_budget == 0 {
            let created = self.registry.fill(&mut self.host, template, target);
            self.stats.record(PoolEvent::Created, created as u64);
            self.stats.record(PoolEvent::Warmed, created as u64);
        } else {
            debug!(?template, target, per_tick_budget, "queued warm-up");
            self.warmup.schedule(template, target, per_tick_budget);
        }
    }

    /// `initialize` with the configured default per-tick budget.
    pub fn warm(&mut self, template: H::Template, target: usize) {
        self.initialize(template, target, self.settings.default_per_tick_budget);
    }

    /// Instances owned by the pool for `template`; zero before first use.
    pub fn pool_count(&self, template: H::Template) -> usize {
        self.registry.count_all(template)
    }

    pub fn available_count(&self, template: H::Template) -> usize {
        self.registry.count_available(template)
    }

    pub fn is_available(&self, instance: H::Instance) -> bool {
        self.registry.is_available(instance)
    }

    pub fn pending_releases(&self) -> usize {
        self.deferred.len()
    }

    pub fn pending_warmups(&self) -> usize {
        self.warmup.len()
    }

    /// Drain due deferred releases, then run one step of every warm-up task.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let drained = self.deferred.take_due(now, |i| self.host.is_live(i));
        for instance in drained.dead {
            self.registry.forget(instance);
        }
        for instance in drained.due {
            self.release(instance);
            self.stats.record(PoolEvent::DeferredReleased, 1);
        }

        let steps = self.warmup.plan(
            |t| self.registry.count_all(t),
            |t| self.host.is_template_live(t),
        );
        for step in steps {
            let created = self.registry.fill(&mut self.host, step.template, step.goal);
            self.stats.record(PoolEvent::Created, created as u64);
            self.stats.record(PoolEvent::Warmed, created as u64);
        }
    }

    /// Destroy every pooled instance and drop all pools, mappings, pending
    /// releases and warm-up tasks.
    pub fn clear(&mut self) {
        let destroyed = self.registry.clear(&mut self.host);
        self.deferred.clear();
        self.warmup.clear();
        debug!(destroyed, "cleared pooling state");
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub fn registry(&self) -> &PoolRegistry<H> {
        &self.registry
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}

impl<H: Host, C: Clock> TickTarget for PoolContext<H, C> {
    fn tick(&mut self) {
        PoolContext::tick(self);
    }

    fn teardown(&mut self) {
        self.clear();
    }

    fn attach(&mut self) -> bool {
        !std::mem::replace(&mut self.attached, true)
    }

    fn detach(&mut self) {
        self.attached = false;
    }
}
