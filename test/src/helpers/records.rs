use sectornet_shared::{
    Component, EntityId, EntityKind, EntityRecord, ItemStack, Owners, PortalComponent, PortalNode,
    StorageComponent, Vec3,
};

pub fn door(owners: Owners) -> EntityRecord {
    EntityRecord::new(EntityKind::DestructibleDoor).with_owners(owners)
}

pub fn food(name: &str) -> EntityRecord {
    EntityRecord::new(EntityKind::Food {
        food_name: name.to_string(),
    })
}

pub fn food_stack(name: &str, count: u32) -> ItemStack {
    ItemStack::new(food(name), count)
}

pub fn item_pickup(position: Vec3, items: Vec<ItemStack>) -> EntityRecord {
    EntityRecord::new(EntityKind::ItemPickup { items })
        .with_transform(position, Vec3::ZERO)
        .with_owners(Owners::anyone())
}

pub fn portal_gate(position: Vec3) -> EntityRecord {
    EntityRecord::new(EntityKind::PortalGate).with_transform(position, Vec3::ZERO)
}

/// Points node 0 of `record`'s portal at node 0 of `target`
pub fn link_portals(record: &mut EntityRecord, target: EntityId, exit_offset: Vec3) {
    if let Some(Component::Portal(portal)) = record.component_mut(0) {
        *portal = PortalComponent {
            nodes: vec![PortalNode {
                target_entity: target,
                target_node: 0,
                exit_position: exit_offset,
                exit_rotation: Vec3::ZERO,
            }],
        };
    }
}

/// An empty storage with `slots` slots, for tests that build inventories by hand
pub fn storage(slots: u16) -> StorageComponent {
    StorageComponent::new(slots)
}
