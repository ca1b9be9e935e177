use super::{InstancePool, Origin};
use crate::host::Host;
use crate::math::Spatial;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What a registry release ended up doing. Nothing here is an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The instance was parked in its pool.
    Pooled,
    /// The owning pool declined: already available, or no longer live.
    Ignored,
    /// Live but with no known pool, so it was destroyed instead.
    DestroyedUntracked,
    /// Not live and not tracked.
    Missing,
}

/// Directory of pools keyed by template, plus the reverse map from every
/// handed-out instance to its template.
///
/// Entries in the instance map go stale when instances are destroyed behind
/// the registry's back. They are dropped when a release or a pool purge
/// meets them, and by a sweep that runs whenever the map has doubled since
/// the previous one.
pub struct PoolRegistry<H: Host> {
    pools: HashMap<H::Template, InstancePool<H>>,
    owners: HashMap<H::Instance, H::Template>,
    name_suffix: String,
    sweep_at: usize,
}

impl<H: Host> PoolRegistry<H> {
    /// Smallest instance map size that triggers a sweep.
    pub const MIN_SWEEP: usize = 64;

    pub fn new(name_suffix: impl Into<String>) -> Self {
        Self {
            pools: HashMap::new(),
            owners: HashMap::new(),
            name_suffix: name_suffix.into(),
            sweep_at: Self::MIN_SWEEP,
        }
    }

    /// Acquire an instance of `template`, creating its pool on first use.
    ///
    /// Returns `None` without creating a pool when the template is not live.
    pub fn get(&mut self, host: &mut H, template: H::Template) -> Option<(H::Instance, Origin)> {
        if !host.is_template_live(template) {
            warn!(?template, "attempted to get an instance from a template that is not live");
            return None;
        }

        let pool = Self::pool_entry(&mut self.pools, &self.name_suffix, host, template);
        let (instance, origin) = pool.get(host);
        for dead in pool.purged() {
            self.owners.remove(dead);
        }
        self.owners.insert(instance, template);
        self.sweep_if_due(host);
        Some((instance, origin))
    }

    /// Route `instance` back to the pool it came from.
    pub fn release(&mut self, host: &mut H, instance: H::Instance) -> ReleaseOutcome {
        let pool = match self.owners.get(&instance) {
            Some(template) => self.pools.get_mut(template),
            None => None,
        };

        if let Some(pool) = pool {
            if pool.release(host, instance) {
                return ReleaseOutcome::Pooled;
            }
            if !host.is_live(instance) {
                warn!(?instance, "attempted to release an instance that is not live");
                pool.forget(instance);
                self.owners.remove(&instance);
            } else if !pool.contains(instance) {
                self.owners.remove(&instance);
            }
            return ReleaseOutcome::Ignored;
        }

        if host.is_live(instance) {
            warn!(?instance, "no pool found for instance, destroying instead");
            self.owners.remove(&instance);
            host.destroy(instance);
            ReleaseOutcome::DestroyedUntracked
        } else {
            warn!(?instance, "attempted to release an instance that is not live");
            ReleaseOutcome::Missing
        }
    }

    /// Grow the pool for `template` synchronously until it owns `target`
    /// instances. Returns how many were created.
    pub fn fill(&mut self, host: &mut H, template: H::Template, target: usize) -> usize {
        if !host.is_template_live(template) {
            warn!(?template, "attempted to initialize a pool from a template that is not live");
            return 0;
        }

        let pool = Self::pool_entry(&mut self.pools, &self.name_suffix, host, template);
        let mut created = 0;
        while pool.count_all() < target {
            let instance = pool.grow(host);
            self.owners.insert(instance, template);
            created += 1;
        }
        if created > 0 {
            debug!(?template, created, total = pool.count_all(), "warmed pool");
        }
        self.sweep_if_due(host);
        created
    }

    /// Drop every trace of an instance that was destroyed elsewhere.
    pub fn forget(&mut self, instance: H::Instance) {
        let Some(template) = self.owners.remove(&instance) else {
            return;
        };
        if let Some(pool) = self.pools.get_mut(&template) {
            pool.forget(instance);
        }
    }

    /// Drop every instance the host no longer considers live from all pools
    /// and from the instance map. Returns how many mappings were dropped.
    pub fn sweep(&mut self, host: &H) -> usize {
        let before = self.owners.len();
        self.owners.retain(|&instance, _| host.is_live(instance));
        for pool in self.pools.values_mut() {
            pool.purge_dead(host);
        }
        self.sweep_at = (self.owners.len() * 2).max(Self::MIN_SWEEP);
        let dropped = before - self.owners.len();
        if dropped > 0 {
            debug!(dropped, remaining = self.owners.len(), "swept stale instance mappings");
        }
        dropped
    }

    /// Instances the registry currently maps to a template.
    pub fn tracked_count(&self) -> usize {
        self.owners.len()
    }

    fn sweep_if_due(&mut self, host: &H) {
        if self.owners.len() >= self.sweep_at {
            self.sweep(host);
        }
    }

    /// Instances owned by the pool for `template`; zero if no pool exists.
    pub fn count_all(&self, template: H::Template) -> usize {
        self.pools.get(&template).map_or(0, InstancePool::count_all)
    }

    pub fn count_available(&self, template: H::Template) -> usize {
        self.pools.get(&template).map_or(0, InstancePool::count_available)
    }

    pub fn is_available(&self, instance: H::Instance) -> bool {
        self.owners
            .get(&instance)
            .and_then(|template| self.pools.get(template))
            .is_some_and(|pool| pool.is_available(instance))
    }

    pub fn has_pool(&self, template: H::Template) -> bool {
        self.pools.contains_key(&template)
    }

    pub fn pool(&self, template: H::Template) -> Option<&InstancePool<H>> {
        self.pools.get(&template)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn owner_of(&self, instance: H::Instance) -> Option<H::Template> {
        self.owners.get(&instance).copied()
    }

    /// Clear every pool (destroying live instances) and forget all mappings.
    /// Returns how many instances were destroyed.
    pub fn clear(&mut self, host: &mut H) -> usize {
        let destroyed: usize = self.pools.values_mut().map(|pool| pool.clear(host)).sum();
        self.pools.clear();
        self.owners.clear();
        self.sweep_at = Self::MIN_SWEEP;
        destroyed
    }

    fn pool_entry<'a>(
        pools: &'a mut HashMap<H::Template, InstancePool<H>>,
        suffix: &str,
        host: &H,
        template: H::Template,
    ) -> &'a mut InstancePool<H> {
        pools.entry(template).or_insert_with(|| {
            debug!(?template, "creating pool");
            let rest = host.template_spatial(template).unwrap_or(Spatial::IDENTITY);
            InstancePool::new(template, format!("{}{}", host.template_name(template), suffix), rest)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PrefabId, SceneWorld};
    use crate::math::Spatial;

    fn setup() -> (SceneWorld, PrefabId, PoolRegistry<SceneWorld>) {
        let mut world = SceneWorld::new();
        let prefab = world.add_prefab("Enemy", Spatial::IDENTITY);
        (world, prefab, PoolRegistry::new(" (Pooled)"))
    }

    #[test]
    fn test_get_creates_pool_lazily() {
        let (mut world, prefab, mut registry) = setup();
        assert!(!registry.has_pool(prefab));
        assert_eq!(registry.count_all(prefab), 0);

        let (e, _) = registry.get(&mut world, prefab).unwrap();
        assert!(registry.has_pool(prefab));
        assert_eq!(registry.owner_of(e), Some(prefab));
        assert_eq!(world.name(e), Some("Enemy (Pooled)"));
    }

    #[test]
    fn test_get_from_dead_template_creates_nothing() {
        let (mut world, prefab, mut registry) = setup();
        world.remove_prefab(prefab);

        assert!(registry.get(&mut world, prefab).is_none());
        assert!(!registry.has_pool(prefab));
        assert_eq!(world.live_count(), 0);
    }

    #[test]
    fn test_release_routes_to_owning_pool() {
        let (mut world, prefab, mut registry) = setup();
        let other = world.add_prefab("Spark", Spatial::IDENTITY);
        let enemy = registry.get(&mut world, prefab).unwrap().0;
        let spark = registry.get(&mut world, other).unwrap().0;

        assert_eq!(registry.release(&mut world, spark), ReleaseOutcome::Pooled);
        assert_eq!(registry.count_available(other), 1);
        assert_eq!(registry.count_available(prefab), 0);
        assert!(registry.is_available(spark));
        assert!(!registry.is_available(enemy));
    }

    #[test]
    fn test_second_release_is_ignored() {
        let (mut world, prefab, mut registry) = setup();
        let e = registry.get(&mut world, prefab).unwrap().0;

        assert_eq!(registry.release(&mut world, e), ReleaseOutcome::Pooled);
        assert_eq!(registry.release(&mut world, e), ReleaseOutcome::Ignored);
        assert_eq!(registry.count_available(prefab), 1);
        assert_eq!(registry.owner_of(e), Some(prefab));
    }

    #[test]
    fn test_untracked_live_instance_is_destroyed() {
        let (mut world, prefab, mut registry) = setup();
        let stray = world.spawn(prefab);

        assert_eq!(registry.release(&mut world, stray), ReleaseOutcome::DestroyedUntracked);
        assert!(!world.is_alive(stray));
    }

    #[test]
    fn test_dead_untracked_instance_is_missing() {
        let (mut world, prefab, mut registry) = setup();
        let stray = world.spawn(prefab);
        world.despawn(stray);

        assert_eq!(registry.release(&mut world, stray), ReleaseOutcome::Missing);
    }

    #[test]
    fn test_dead_tracked_instance_drops_stale_mapping() {
        let (mut world, prefab, mut registry) = setup();
        let e = registry.get(&mut world, prefab).unwrap().0;
        world.despawn(e);

        assert_eq!(registry.release(&mut world, e), ReleaseOutcome::Ignored);
        assert_eq!(registry.owner_of(e), None);
        assert_eq!(registry.release(&mut world, e), ReleaseOutcome::Missing);
    }

    #[test]
    fn test_dead_tracked_instance_leaves_its_pool() {
        let (mut world, prefab, mut registry) = setup();
        let e = registry.get(&mut world, prefab).unwrap().0;
        registry.release(&mut world, e);
        world.despawn(e);

        assert_eq!(registry.release(&mut world, e), ReleaseOutcome::Ignored);
        assert_eq!(registry.count_all(prefab), 0);
        assert_eq!(registry.count_available(prefab), 0);
    }

    #[test]
    fn test_destroyed_active_instances_do_not_accumulate() {
        let (mut world, prefab, mut registry) = setup();
        for _ in 0..1000 {
            let (e, _) = registry.get(&mut world, prefab).unwrap();
            world.despawn(e);
        }

        assert!(registry.tracked_count() < PoolRegistry::<SceneWorld>::MIN_SWEEP);
        assert!(registry.count_all(prefab) < PoolRegistry::<SceneWorld>::MIN_SWEEP);
        assert_eq!(world.live_count(), 0);
    }

    #[test]
    fn test_purged_instances_are_unmapped_on_get() {
        let (mut world, prefab, mut registry) = setup();
        let a = registry.get(&mut world, prefab).unwrap().0;
        let b = registry.get(&mut world, prefab).unwrap().0;
        registry.release(&mut world, a);
        world.despawn(a);
        world.despawn(b);

        registry.get(&mut world, prefab);
        assert_eq!(registry.owner_of(a), None);
        assert_eq!(registry.owner_of(b), None);
        assert_eq!(registry.tracked_count(), 1);
    }

    #[test]
    fn test_forget_drops_mapping_and_membership() {
        let (mut world, prefab, mut registry) = setup();
        let e = registry.get(&mut world, prefab).unwrap().0;
        world.despawn(e);

        registry.forget(e);
        assert_eq!(registry.owner_of(e), None);
        assert_eq!(registry.count_all(prefab), 0);
    }

    #[test]
    fn test_sweep_keeps_live_instances() {
        let (mut world, prefab, mut registry) = setup();
        let keep = registry.get(&mut world, prefab).unwrap().0;
        let gone = registry.get(&mut world, prefab).unwrap().0;
        world.despawn(gone);

        assert_eq!(registry.sweep(&world), 1);
        assert_eq!(registry.owner_of(keep), Some(prefab));
        assert_eq!(registry.count_all(prefab), 1);
    }

    #[test]
    fn test_fill_reaches_exact_target() {
        let (mut world, prefab, mut registry) = setup();
        assert_eq!(registry.fill(&mut world, prefab, 5), 5);
        assert_eq!(registry.count_all(prefab), 5);
        assert_eq!(registry.count_available(prefab), 5);
        assert_eq!(world.active_entities().count(), 0);

        assert_eq!(registry.fill(&mut world, prefab, 3), 0);
        assert_eq!(registry.count_all(prefab), 5);
    }

    #[test]
    fn test_filled_instances_are_recycled() {
        let (mut world, prefab, mut registry) = setup();
        registry.fill(&mut world, prefab, 2);
        let (_, origin) = registry.get(&mut world, prefab).unwrap();
        assert_eq!(origin, Origin::Recycled);
        assert_eq!(registry.count_all(prefab), 2);
    }

    #[test]
    fn test_clear_destroys_everything() {
        let (mut world, prefab, mut registry) = setup();
        registry.fill(&mut world, prefab, 3);
        let active = registry.get(&mut world, prefab).unwrap().0;

        assert_eq!(registry.clear(&mut world), 3);
        assert_eq!(world.live_count(), 0);
        assert_eq!(registry.pool_count(), 0);
        assert_eq!(registry.owner_of(active), None);
        assert_eq!(registry.count_all(prefab), 0);
    }
}
