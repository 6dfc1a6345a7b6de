use sectornet_shared::{
    owns, DropReason, EntityId, Handles, Message, MessageOutcome, PeerId, Rejection, SectorId,
};

use crate::world::ServerWorld;

mod commands;
mod component_overwrite;
mod portal;
mod storage;
mod transform;

/// Server-side effect of a message received from `peer`
pub(crate) trait OnServer: Message {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome;
}

/// Routes dispatched messages from one peer into the world
pub(crate) struct ServerHandler<'w> {
    pub peer: PeerId,
    pub world: &'w mut ServerWorld,
}

impl<'w> ServerHandler<'w> {
    pub fn new(peer: PeerId, world: &'w mut ServerWorld) -> Self {
        Self { peer, world }
    }
}

impl<M: OnServer> Handles<M> for ServerHandler<'_> {
    fn handle(&mut self, message: M) -> MessageOutcome {
        message.on_server(self.peer, self.world)
    }
}

/// Finds an entity in the peer's sector that the peer may mutate. The error
/// is the outcome to report.
pub(crate) fn owned_entity(
    world: &ServerWorld,
    peer: PeerId,
    entity_id: EntityId,
) -> Result<SectorId, MessageOutcome> {
    let Some(sector_id) = world.active_sector(peer) else {
        return Err(DropReason::UnknownPeer(peer).into());
    };
    let Some(record) = world
        .sector(sector_id)
        .and_then(|sector| sector.record(entity_id))
    else {
        return Err(DropReason::StaleEntity(entity_id).into());
    };
    if !owns(peer, record) {
        return Err(Rejection::NotOwner { peer, entity_id }.into());
    }
    Ok(sector_id)
}

macro_rules! try_outcome {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(outcome) => return outcome,
        }
    };
}
pub(crate) use try_outcome;
