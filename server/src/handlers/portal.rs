use sectornet_shared::{DropReason, MessageOutcome, PeerId, UsePortal};

use crate::{handlers::OnServer, world::ServerWorld};

impl OnServer for UsePortal {
    fn on_server(self, peer: PeerId, world: &mut ServerWorld) -> MessageOutcome {
        let Some(sector_id) = world.active_sector(peer) else {
            return DropReason::UnknownPeer(peer).into();
        };
        let holder_here = world
            .sector(sector_id)
            .map_or(false, |sector| sector.contains(self.entity_id));
        if !holder_here {
            return DropReason::StaleEntity(self.entity_id).into();
        }

        match world.transfer_through_portal(peer, self.entity_id, self.portal_id) {
            Ok(()) => MessageOutcome::Applied,
            Err(rejection) => rejection.into(),
        }
    }
}
