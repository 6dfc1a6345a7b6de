use sectornet_shared::{
    ClientInitializer, DestroyEntity, Message, MessageOutcome, PeerId, SpawnEntity,
};

use crate::{
    handlers::{owned_entity, try_outcome, OnServer},
    world::ServerWorld,
};

// Server-to-client commands are never accepted from a client

impl OnServer for ClientInitializer {
    fn on_server(self, _: PeerId, _: &mut ServerWorld) -> MessageOutcome {
        MessageOutcome::wrong_role(Self::KIND)
    }
}

impl OnServer for SpawnEntity {
    fn on_server(self, _: PeerId, _: &mut ServerWorld) -> MessageOutcome {
        MessageOutcome::wrong_role(Self::KIND)
    }
}

impl OnServer for DestroyEntity {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        try_outcome!(owned_entity(world, peer, self.entity_id));
        world.destroy_entity(self.entity_id);
        MessageOutcome::Applied
    }
}
