use thiserror::Error;

use sectornet_shared::{
    ComponentKind, EntityId, PeerId, PersistenceError, SectorId, StorageError, TransportError,
};

/// Errors that stop the server from starting or from managing world data
#[derive(Debug, Error)]
pub enum SectornetServerError {
    /// The transport could not start listening
    #[error("Server failed to listen: {0}")]
    Listen(#[source] TransportError),

    /// World metadata could not be read at startup
    #[error("Failed to load world data: {0}")]
    WorldLoad(#[source] PersistenceError),

    /// A sector file could not be read or written
    #[error("Failed to persist sector {sector_id}: {source}")]
    SectorPersistence {
        sector_id: SectorId,
        #[source]
        source: PersistenceError,
    },

    /// World metadata could not be written
    #[error("Failed to save world data: {0}")]
    WorldSave(#[source] PersistenceError),

    /// The sector id is not registered in the world metadata
    #[error("Sector {0} does not exist")]
    UnknownSector(SectorId),

    /// The sector still has connected peers and cannot be unloaded
    #[error("Sector {sector_id} still has {peers} connected peers")]
    SectorOccupied { sector_id: SectorId, peers: usize },

    /// The peer is not connected
    #[error("Peer {0} is not connected")]
    UnknownPeer(PeerId),
}

/// Why a server-initiated entity operation could not be carried out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityActionError {
    /// The entity is not in any loaded sector
    #[error("Entity {0} is not loaded")]
    UnknownEntity(EntityId),

    /// The entity has no component of the requested kind
    #[error("Entity {entity_id} has no {kind:?} component")]
    MissingComponent {
        entity_id: EntityId,
        kind: ComponentKind,
    },

    /// The entity is not an item pickup
    #[error("Entity {0} is not an item pickup")]
    NotAPickup(EntityId),

    /// The two entities are not in the same sector
    #[error("Entities {first} and {second} are in different sectors")]
    DifferentSectors { first: EntityId, second: EntityId },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
