use log::warn;

use sectornet_shared::{
    perform_storage_action, DeliveryMethod, DropReason, MessageOutcome, PeerId, Rejection,
    StorageAction, StorageActionError, StorageDrop,
};

use crate::{
    handlers::{owned_entity, try_outcome, OnServer},
    world::ServerWorld,
};

impl OnServer for StorageAction {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        let sector_id = try_outcome!(owned_entity(world, peer, self.source_entity));
        if try_outcome!(owned_entity(world, peer, self.dest_entity)) != sector_id {
            return DropReason::StaleEntity(self.dest_entity).into();
        }
        let Some((sector, _, _, events)) = world.sector_parts(sector_id) else {
            return DropReason::StaleEntity(self.source_entity).into();
        };

        if let Err(error) = perform_storage_action(sector.records_mut(), &self) {
            return match error {
                StorageActionError::MissingEntity(entity_id) => {
                    DropReason::StaleEntity(entity_id).into()
                }
                StorageActionError::NotAStorage { entity_id, index } => {
                    Rejection::NotAStorage { entity_id, index }.into()
                }
                StorageActionError::Storage(error) => Rejection::from(error).into(),
            };
        }

        events.push_inventory_change(self.source_entity, self.source_component);
        events.push_inventory_change(self.dest_entity, self.dest_component);

        let mut changed = vec![(self.source_entity, self.source_component)];
        if !self.is_within_one_storage() {
            changed.push((self.dest_entity, self.dest_component));
        }
        for (entity_id, index) in changed {
            // owners reconcile their prediction against this
            let _ = world.net_update_component(
                entity_id,
                index,
                true,
                DeliveryMethod::ReliableOrdered,
            );
        }
        MessageOutcome::Applied
    }
}

impl OnServer for StorageDrop {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        let sector_id = try_outcome!(owned_entity(world, peer, self.entity_id));
        let Some((sector, _, _, events)) = world.sector_parts(sector_id) else {
            return DropReason::StaleEntity(self.entity_id).into();
        };
        let Some(record) = sector.record_mut(self.entity_id) else {
            return DropReason::StaleEntity(self.entity_id).into();
        };

        let position = record.position;
        let Some(storage) = record.storage_mut(self.component_index) else {
            return Rejection::NotAStorage {
                entity_id: self.entity_id,
                index: self.component_index,
            }
            .into();
        };
        let stack = match storage.drop_slot(self.slot) {
            Ok(stack) => stack,
            Err(error) => return Rejection::from(error).into(),
        };
        events.push_inventory_change(self.entity_id, self.component_index);

        let _ = world.net_update_component(
            self.entity_id,
            self.component_index,
            true,
            DeliveryMethod::ReliableOrdered,
        );
        if let Err(error) = world.spawn_pickup(sector_id, position, stack) {
            warn!("Dropped items from entity {} were lost: {}", self.entity_id, error);
        }
        MessageOutcome::Applied
    }
}
