use thiserror::Error;

use sectornet_serde::SerdeErr;

use crate::{world::component::ComponentKind, ComponentIndex, EntityId};

/// Reasons a component overwrite leaves the registry untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverwriteError {
    /// The index does not address any component of the entity
    #[error("Component index {index} is out of range for entity {entity_id}, which has {len} components")]
    IndexOutOfRange {
        entity_id: EntityId,
        index: ComponentIndex,
        len: usize,
    },

    /// The payload describes a different component kind than the one at the index
    #[error("Component at index {index} is {expected:?} but the payload holds {found:?}")]
    KindMismatch {
        index: ComponentIndex,
        expected: ComponentKind,
        found: ComponentKind,
    },

    /// The payload could not be decoded
    #[error("Component payload is malformed: {0}")]
    Malformed(#[from] SerdeErr),
}
