use std::{mem, vec::IntoIter};

use log::warn;

use crate::{
    types::{ComponentIndex, EntityId},
    world::component::ComponentKind,
};

/// Outbound notifications for the presentation layer, drained once per tick
pub struct WorldEvents {
    component_updates: Vec<(EntityId, ComponentIndex, ComponentKind)>,
    inventory_changes: Vec<(EntityId, ComponentIndex)>,
    health_depletions: Vec<(EntityId, i32)>,
    spawns: Vec<EntityId>,
    destroys: Vec<EntityId>,
    transforms: Vec<EntityId>,
    empty: bool,
}

impl Default for WorldEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldEvents {
    pub fn new() -> Self {
        Self {
            component_updates: Vec::new(),
            inventory_changes: Vec::new(),
            health_depletions: Vec::new(),
            spawns: Vec::new(),
            destroys: Vec::new(),
            transforms: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: WorldEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: WorldEvent>(&self) -> bool {
        V::has(self)
    }

    /// Discards everything buffered
    pub fn clear(&mut self) {
        self.component_updates.clear();
        self.inventory_changes.clear();
        self.health_depletions.clear();
        self.spawns.clear();
        self.destroys.clear();
        self.transforms.clear();
        self.empty = true;
    }

    // Pushers

    pub fn push_component_update(
        &mut self,
        entity_id: EntityId,
        index: ComponentIndex,
        kind: ComponentKind,
    ) {
        self.component_updates.push((entity_id, index, kind));
        self.empty = false;
    }

    pub fn push_inventory_change(&mut self, entity_id: EntityId, index: ComponentIndex) {
        if !self.inventory_changes.contains(&(entity_id, index)) {
            self.inventory_changes.push((entity_id, index));
        }
        self.empty = false;
    }

    pub fn push_health_depleted(&mut self, entity_id: EntityId, health: i32) {
        self.health_depletions.push((entity_id, health));
        self.empty = false;
    }

    pub fn push_spawn(&mut self, entity_id: EntityId) {
        self.spawns.push(entity_id);
        self.empty = false;
    }

    pub fn push_destroy(&mut self, entity_id: EntityId) {
        self.destroys.push(entity_id);
        self.empty = false;
    }

    pub fn push_transform(&mut self, entity_id: EntityId) {
        self.transforms.push(entity_id);
        self.empty = false;
    }

    fn refresh_empty(&mut self) {
        self.empty = self.component_updates.is_empty()
            && self.inventory_changes.is_empty()
            && self.health_depletions.is_empty()
            && self.spawns.is_empty()
            && self.destroys.is_empty()
            && self.transforms.is_empty();
    }
}

impl Drop for WorldEvents {
    fn drop(&mut self) {
        if !self.health_depletions.is_empty() {
            warn!("Dropped HealthDepleted Event(s)! Make sure to handle these through `events.read::<HealthDepletedEvent>()`");
        }
    }
}

// Event Trait
pub trait WorldEvent {
    type Iter;

    fn iter(events: &mut WorldEvents) -> Self::Iter;

    fn has(events: &WorldEvents) -> bool;
}

macro_rules! world_event {
    ($event:ident, $field:ident, $item:ty) => {
        pub struct $event;
        impl WorldEvent for $event {
            type Iter = IntoIter<$item>;

            fn iter(events: &mut WorldEvents) -> Self::Iter {
                let list = mem::take(&mut events.$field);
                events.refresh_empty();
                IntoIterator::into_iter(list)
            }

            fn has(events: &WorldEvents) -> bool {
                !events.$field.is_empty()
            }
        }
    };
}

// Component Updated Event
world_event!(
    ComponentUpdatedEvent,
    component_updates,
    (EntityId, ComponentIndex, ComponentKind)
);

// Inventory Changed Event
world_event!(InventoryChangedEvent, inventory_changes, (EntityId, ComponentIndex));

// Health Depleted Event
world_event!(HealthDepletedEvent, health_depletions, (EntityId, i32));

// Entity Spawned Event
world_event!(EntitySpawnedEvent, spawns, EntityId);

// Entity Destroyed Event
world_event!(EntityDestroyedEvent, destroys, EntityId);

// Transform Changed Event
world_event!(TransformChangedEvent, transforms, EntityId);
