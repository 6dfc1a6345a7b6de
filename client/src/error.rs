use std::time::Duration;

use thiserror::Error;

use sectornet_shared::{
    ComponentIndex, ComponentKind, EntityId, StorageActionError, StorageError, TransportError,
};

#[derive(Debug, Error)]
pub enum SectornetClientError {
    #[error("Server did not answer the login within {0:?}")]
    ConnectTimeout(Duration),

    #[error("Server refused the login: {reason}")]
    Rejected { reason: String },

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Entity {0} is not in the local replica")]
    UnknownEntity(EntityId),

    #[error("This client does not own entity {0}")]
    NotOwner(EntityId),

    #[error("Entity {entity_id} has no {kind:?} component")]
    MissingComponent {
        entity_id: EntityId,
        kind: ComponentKind,
    },

    #[error("Component {index} of entity {entity_id} is not a storage")]
    NotAStorage {
        entity_id: EntityId,
        index: ComponentIndex,
    },

    #[error("Storage operation refused: {0}")]
    Storage(#[from] StorageError),

    #[error("Message of {len} bytes exceeds the {max} byte limit")]
    Oversized { len: usize, max: usize },
}

impl From<StorageActionError> for SectornetClientError {
    fn from(error: StorageActionError) -> Self {
        match error {
            StorageActionError::MissingEntity(entity_id) => {
                SectornetClientError::UnknownEntity(entity_id)
            }
            StorageActionError::NotAStorage { entity_id, index } => {
                SectornetClientError::NotAStorage { entity_id, index }
            }
            StorageActionError::Storage(error) => SectornetClientError::Storage(error),
        }
    }
}
