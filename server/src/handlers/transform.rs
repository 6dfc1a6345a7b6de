use sectornet_shared::{
    DropReason, EntityKind, Message, MessageOutcome, PeerId, PlayerTransform, TransformUpdate,
};

use crate::{
    handlers::{owned_entity, try_outcome, OnServer},
    world::ServerWorld,
};

impl OnServer for TransformUpdate {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        let sector_id = try_outcome!(owned_entity(world, peer, self.entity_id));
        let delivery = world.protocol().delivery_for(Self::KIND);
        let Some((sector, io, scene, events)) = world.sector_parts(sector_id) else {
            return DropReason::StaleEntity(self.entity_id).into();
        };

        sector.apply_transform(self.entity_id, self.position, self.rotation, scene);
        events.push_transform(self.entity_id);
        sector.echo_to_sector(io, &self, delivery, Some(peer));
        MessageOutcome::Applied
    }
}

impl OnServer for PlayerTransform {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        let sector_id = try_outcome!(owned_entity(world, peer, self.entity_id));
        let delivery = world.protocol().delivery_for(Self::KIND);
        let Some((sector, io, scene, events)) = world.sector_parts(sector_id) else {
            return DropReason::StaleEntity(self.entity_id).into();
        };

        sector.apply_transform(self.entity_id, self.position, self.rotation, scene);
        if let Some(record) = sector.record_mut(self.entity_id) {
            if let EntityKind::Player { head_rotation, .. } = record.kind_mut() {
                *head_rotation = self.head_rotation;
            }
        }
        events.push_transform(self.entity_id);
        sector.echo_to_sector(io, &self, delivery, Some(peer));
        MessageOutcome::Applied
    }
}
