use sectornet_shared::{
    ComponentOverwriteUpdate, DropReason, Message, MessageOutcome, OverwriteError, PeerId,
    Rejection,
};

use crate::{
    handlers::{owned_entity, try_outcome, OnServer},
    world::ServerWorld,
};

impl OnServer for ComponentOverwriteUpdate {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        let sector_id = try_outcome!(owned_entity(world, peer, self.entity_id));
        let delivery = world.protocol().delivery_for(Self::KIND);
        let Some((sector, io, _, events)) = world.sector_parts(sector_id) else {
            return DropReason::StaleEntity(self.entity_id).into();
        };
        let Some(record) = sector.record_mut(self.entity_id) else {
            return DropReason::StaleEntity(self.entity_id).into();
        };

        let Some(current) = record.component(self.component_index) else {
            return Rejection::from(OverwriteError::IndexOutOfRange {
                entity_id: self.entity_id,
                index: self.component_index,
                len: record.components().len(),
            })
            .into();
        };
        let kind = current.kind();
        if !kind.client_writable() {
            return Rejection::ReadOnlyComponent { kind }.into();
        }

        if let Err(error) = record.overwrite_component(self.component_index, &self.payload) {
            return Rejection::from(error).into();
        }
        events.push_component_update(self.entity_id, self.component_index, kind);
        sector.echo_to_sector(io, &self, delivery, Some(peer));
        MessageOutcome::Applied
    }
}
