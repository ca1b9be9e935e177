// world.rs - Reference host with prefabs and generational entity slots

use super::{Entity, Host, PrefabId};
use crate::math::Spatial;

/// A blueprint entities are spawned from.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefab {
    pub name: String,
    pub spatial: Spatial,
}

#[derive(Debug)]
struct Occupant {
    prefab: PrefabId,
    name: String,
    active: bool,
    spatial: Spatial,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    occupant: Option<Occupant>,
}

/// Minimal scene: a prefab table plus entity slots that are reused with a
/// bumped generation after despawn.
#[derive(Debug, Default)]
pub struct SceneWorld {
    prefabs: Vec<Option<Prefab>>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    spawned_total: u64,
}

impl SceneWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prefab(&mut self, name: impl Into<String>, spatial: Spatial) -> PrefabId {
        let id = PrefabId::new(self.prefabs.len() as u32);
        self.prefabs.push(Some(Prefab {
            name: name.into(),
            spatial,
        }));
        id
    }

    /// Unload a prefab. Existing entities survive; the id stops being live.
    pub fn remove_prefab(&mut self, id: PrefabId) -> bool {
        self.prefabs
            .get_mut(id.index() as usize)
            .and_then(Option::take)
            .is_some()
    }

    pub fn prefab(&self, id: PrefabId) -> Option<&Prefab> {
        self.prefabs.get(id.index() as usize)?.as_ref()
    }

    /// Spawn an entity from a prefab.
    ///
    /// Free slots are reused; the handle carries the slot's current
    /// generation. A removed prefab spawns with identity spatial state.
    pub fn spawn(&mut self, prefab: PrefabId) -> Entity {
        let (name, spatial) = match self.prefab(prefab) {
            Some(p) => (p.name.clone(), p.spatial),
            None => (prefab.to_string(), Spatial::IDENTITY),
        };
        let occupant = Occupant {
            prefab,
            name,
            active: true,
            spatial,
        };

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.occupant = Some(occupant);
        self.live += 1;
        self.spawned_total += 1;
        Entity::new(index, slot.generation)
    }

    /// Despawn an entity.
    ///
    /// The slot's generation is incremented, invalidating every handle that
    /// still points at it. Returns false for stale handles.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.slot_mut(entity) else {
            return false;
        };
        slot.occupant = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(entity.index());
        self.live -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.occupant(entity).is_some()
    }

    pub fn is_active(&self, entity: Entity) -> Option<bool> {
        self.occupant(entity).map(|o| o.active)
    }

    pub fn spatial(&self, entity: Entity) -> Option<Spatial> {
        self.occupant(entity).map(|o| o.spatial)
    }

    pub fn spatial_mut(&mut self, entity: Entity) -> Option<&mut Spatial> {
        self.occupant_mut(entity).map(|o| &mut o.spatial)
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.occupant(entity).map(|o| o.name.as_str())
    }

    pub fn prefab_of(&self, entity: Entity) -> Option<PrefabId> {
        self.occupant(entity).map(|o| o.prefab)
    }

    /// Number of entities currently alive.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of spawns since the world was created.
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Iterate live entities that are currently active.
    pub fn active_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.occupant
                .as_ref()
                .filter(|o| o.active)
                .map(|_| Entity::new(i as u32, slot.generation))
        })
    }

    fn slot_mut(&mut self, entity: Entity) -> Option<&mut Slot> {
        self.slots
            .get_mut(entity.index() as usize)
            .filter(|slot| slot.generation == entity.generation() && slot.occupant.is_some())
    }

    fn occupant(&self, entity: Entity) -> Option<&Occupant> {
        let slot = self.slots.get(entity.index() as usize)?;
        if slot.generation != entity.generation() {
            return None;
        }
        slot.occupant.as_ref()
    }

    fn occupant_mut(&mut self, entity: Entity) -> Option<&mut Occupant> {
        self.slot_mut(entity)?.occupant.as_mut()
    }
}

impl Host for SceneWorld {
    type Template = PrefabId;
    type Instance = Entity;

    fn instantiate(&mut self, template: PrefabId) -> Entity {
        self.spawn(template)
    }

    fn destroy(&mut self, instance: Entity) {
        self.despawn(instance);
    }

    fn set_active(&mut self, instance: Entity, active: bool) {
        if let Some(occupant) = self.occupant_mut(instance) {
            occupant.active = active;
        }
    }

    fn template_spatial(&self, template: PrefabId) -> Option<Spatial> {
        self.prefab(template).map(|p| p.spatial)
    }

    fn set_spatial(&mut self, instance: Entity, spatial: Spatial) {
        if let Some(current) = self.spatial_mut(instance) {
            *current = spatial;
        }
    }

    fn is_live(&self, instance: Entity) -> bool {
        self.is_alive(instance)
    }

    fn is_template_live(&self, template: PrefabId) -> bool {
        self.prefab(template).is_some()
    }

    fn template_name(&self, template: PrefabId) -> String {
        self.prefab(template)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| template.to_string())
    }

    fn set_name(&mut self, instance: Entity, name: String) {
        if let Some(occupant) = self.occupant_mut(instance) {
            occupant.name = name;
        }
    }
}
