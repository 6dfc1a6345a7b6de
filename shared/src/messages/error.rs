use thiserror::Error;

use sectornet_serde::SerdeErr;

use crate::{
    messages::message_kind::MessageKind,
    types::{EntityId, PeerId},
    world::{
        component::{ComponentKind, OverwriteError},
        storage::StorageError,
    },
};

/// Errors reading a packet before it reaches a handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Packet was shorter than the message tag
    #[error("Packet of {len} bytes is too short to hold a message tag")]
    MissingTag { len: usize },

    /// Tag does not name any message kind
    #[error("Unknown message tag {tag}")]
    UnknownTag { tag: u16 },

    /// Payload did not decode as the tagged message
    #[error("Malformed {kind:?} payload: {source}")]
    Malformed {
        kind: MessageKind,
        #[source]
        source: SerdeErr,
    },

    /// Packet is larger than the configured limit
    #[error("Packet of {len} bytes exceeds the {max} byte limit")]
    Oversized { len: usize, max: usize },
}

/// Why a handler refused a well-formed message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Peer {peer} does not own entity {entity_id}")]
    NotOwner { peer: PeerId, entity_id: EntityId },

    #[error("Clients may not overwrite {kind:?} components")]
    ReadOnlyComponent { kind: ComponentKind },

    #[error("Component {index} of entity {entity_id} is not a storage")]
    NotAStorage { entity_id: EntityId, index: u32 },

    #[error("Storage operation refused: {0}")]
    Storage(#[from] StorageError),

    #[error("Overwrite refused: {0}")]
    Overwrite(#[from] OverwriteError),

    #[error("Portal node {portal_id} of entity {entity_id} cannot be used")]
    InvalidPortal { entity_id: EntityId, portal_id: u8 },
}

/// Why a message was discarded without being considered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The addressed entity is not in the receiver's table
    #[error("Entity {0} is not known here")]
    StaleEntity(EntityId),

    /// The sending peer is no longer connected
    #[error("Peer {0} is not connected")]
    UnknownPeer(PeerId),

    /// The message only flows the other way
    #[error("{0:?} is not accepted by this side")]
    WrongRole(MessageKind),
}
