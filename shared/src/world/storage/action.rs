use std::{collections::BTreeMap, mem};

use thiserror::Error;

use crate::{
    messages::storage::StorageAction,
    types::{ComponentIndex, EntityId},
    world::{
        entity_record::EntityRecord,
        storage::{MoveKind, StorageComponent, StorageError},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageActionError {
    #[error("Entity {0} is not known here")]
    MissingEntity(EntityId),

    #[error("Component {index} of entity {entity_id} is not a storage")]
    NotAStorage {
        entity_id: EntityId,
        index: ComponentIndex,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Carries out `action` against the records in `records`. Both storages are
/// left untouched when the move is refused.
pub fn perform_storage_action(
    records: &mut BTreeMap<EntityId, EntityRecord>,
    action: &StorageAction,
) -> Result<MoveKind, StorageActionError> {
    let mut source = take_storage(records, action.source_entity, action.source_component)?;

    if action.is_within_one_storage() {
        let result = source.move_within(action.source_slot, action.dest_slot, action.count);
        put_storage(records, action.source_entity, action.source_component, source);
        return result.map_err(StorageActionError::from);
    }

    let mut dest = match take_storage(records, action.dest_entity, action.dest_component) {
        Ok(dest) => dest,
        Err(error) => {
            put_storage(records, action.source_entity, action.source_component, source);
            return Err(error);
        }
    };

    let result = StorageComponent::move_between(
        &mut source,
        &mut dest,
        action.source_slot,
        action.dest_slot,
        action.count,
    );
    put_storage(records, action.source_entity, action.source_component, source);
    put_storage(records, action.dest_entity, action.dest_component, dest);
    result.map_err(StorageActionError::from)
}

fn take_storage(
    records: &mut BTreeMap<EntityId, EntityRecord>,
    entity_id: EntityId,
    index: ComponentIndex,
) -> Result<StorageComponent, StorageActionError> {
    let record = records
        .get_mut(&entity_id)
        .ok_or(StorageActionError::MissingEntity(entity_id))?;
    let storage = record
        .storage_mut(index)
        .ok_or(StorageActionError::NotAStorage { entity_id, index })?;
    Ok(mem::take(storage))
}

fn put_storage(
    records: &mut BTreeMap<EntityId, EntityRecord>,
    entity_id: EntityId,
    index: ComponentIndex,
    storage: StorageComponent,
) {
    if let Some(slot) = records
        .get_mut(&entity_id)
        .and_then(|record| record.storage_mut(index))
    {
        *slot = storage;
    }
}
