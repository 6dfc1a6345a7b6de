use crate::{types::PeerId, world::entity_record::EntityRecord};

/// Whether `peer` may mutate `record`: true when the owners contain the
/// peer or the anyone sentinel. Server-originated changes never ask.
pub fn owns(peer: PeerId, record: &EntityRecord) -> bool {
    record.owners.permits(peer)
}
