use crate::host::Host;
use crate::math::Spatial;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Where an acquired instance came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Dequeued from the available queue.
    Recycled,
    /// Freshly instantiated from the template.
    Created,
}

/// Recycling pool for a single template.
///
/// `all` holds every instance this pool ever created that has not been
/// found dead. `available` mirrors `queue` for O(1) membership checks; an
/// instance is in both iff it is inactive and ready to be handed out.
pub struct InstancePool<H: Host> {
    template: H::Template,
    pooled_name: String,
    rest_spatial: Spatial,
    all: HashSet<H::Instance>,
    available: HashSet<H::Instance>,
    queue: VecDeque<H::Instance>,
    purged: Vec<H::Instance>,
}

impl<H: Host> InstancePool<H> {
    /// Create an empty pool. New instances get `pooled_name`.
    ///
    /// `rest_spatial` is the template's spatial state at creation. Release
    /// falls back to it once the host no longer knows the template.
    pub fn new(template: H::Template, pooled_name: impl Into<String>, rest_spatial: Spatial) -> Self {
        Self {
            template,
            pooled_name: pooled_name.into(),
            rest_spatial,
            all: HashSet::new(),
            available: HashSet::new(),
            queue: VecDeque::new(),
            purged: Vec::new(),
        }
    }

    #[inline]
    pub fn template(&self) -> H::Template {
        self.template
    }

    /// Number of instances owned by this pool, active or not.
    #[inline]
    pub fn count_all(&self) -> usize {
        self.all.len()
    }

    #[inline]
    pub fn count_available(&self) -> usize {
        self.available.len()
    }

    pub fn contains(&self, instance: H::Instance) -> bool {
        self.all.contains(&instance)
    }

    pub fn is_available(&self, instance: H::Instance) -> bool {
        self.available.contains(&instance)
    }

    /// Handles dropped by the purges of the most recent [`get`](Self::get)
    /// or [`purge_dead`](Self::purge_dead) call.
    pub fn purged(&self) -> &[H::Instance] {
        &self.purged
    }

    /// Hand out an active instance, recycling the oldest released one when
    /// possible. Dead entries met on the way trigger a full purge.
    pub fn get(&mut self, host: &mut H) -> (H::Instance, Origin) {
        self.purged.clear();
        while let Some(instance) = self.queue.pop_front() {
            if !host.is_live(instance) {
                self.purge_into(host);
                debug!(template = ?self.template, purged = self.purged.len(), "purged externally destroyed instances");
                continue;
            }
            self.available.remove(&instance);
            host.set_active(instance, true);
            trace!(template = ?self.template, ?instance, "recycled instance");
            return (instance, Origin::Recycled);
        }

        (self.create(host), Origin::Created)
    }

    /// Park `instance` at the tail of the queue, inactive and reset to the
    /// template's spatial state.
    ///
    /// Returns false (and does nothing) for dead instances, instances this
    /// pool does not own, and instances that are already available.
    pub fn release(&mut self, host: &mut H, instance: H::Instance) -> bool {
        if !host.is_live(instance)
            || !self.all.contains(&instance)
            || self.available.contains(&instance)
        {
            return false;
        }

        host.set_active(instance, false);
        let spatial = host.template_spatial(self.template).unwrap_or(self.rest_spatial);
        host.set_spatial(instance, spatial);
        self.available.insert(instance);
        self.queue.push_back(instance);
        true
    }

    /// Create one instance and park it straight away.
    pub fn grow(&mut self, host: &mut H) -> H::Instance {
        let instance = self.create(host);
        self.release(host, instance);
        instance
    }

    /// Destroy every live instance and forget all bookkeeping.
    /// Returns how many instances were destroyed.
    pub fn clear(&mut self, host: &mut H) -> usize {
        let mut destroyed = 0;
        for &instance in &self.all {
            if host.is_live(instance) {
                host.destroy(instance);
                destroyed += 1;
            }
        }
        self.all.clear();
        self.available.clear();
        self.queue.clear();
        self.purged.clear();
        destroyed
    }

    /// Drop `instance` from the bookkeeping without touching the host.
    /// Returns false if the pool did not own it.
    pub fn forget(&mut self, instance: H::Instance) -> bool {
        if !self.all.remove(&instance) {
            return false;
        }
        if self.available.remove(&instance) {
            self.queue.retain(|&i| i != instance);
        }
        true
    }

    /// Drop every instance the host no longer considers live, active ones
    /// included. Returns how many were dropped; see [`purged`](Self::purged).
    pub fn purge_dead(&mut self, host: &H) -> usize {
        self.purged.clear();
        self.purge_into(host);
        self.purged.len()
    }

    fn create(&mut self, host: &mut H) -> H::Instance {
        let instance = host.instantiate(self.template);
        host.set_name(instance, self.pooled_name.clone());
        self.all.insert(instance);
        host.set_active(instance, true);
        trace!(template = ?self.template, ?instance, total = self.all.len(), "instantiated");
        instance
    }

    fn purge_into(&mut self, host: &H) {
        let purged = &mut self.purged;
        self.all.retain(|&i| {
            let live = host.is_live(i);
            if !live {
                purged.push(i);
            }
            live
        });
        self.available.retain(|&i| host.is_live(i));
        self.queue.retain(|&i| host.is_live(i));
    }
}
