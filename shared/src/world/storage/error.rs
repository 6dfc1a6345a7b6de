use thiserror::Error;

/// Reasons a storage operation is refused. A refused operation changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Slot {slot} is out of range, storage has {max_slots} slots")]
    SlotOutOfRange { slot: u16, max_slots: u16 },

    #[error("Slot {slot} is empty")]
    EmptySlot { slot: u16 },

    #[error("Cannot move {count} items from a stack of {available}")]
    InvalidCount { count: u32, available: u32 },

    #[error("Source and destination are the same slot {slot}")]
    SameSlot { slot: u16 },

    #[error("Slot {slot} is occupied by an incompatible stack")]
    DestinationOccupied { slot: u16 },

    #[error("Storage has no room for the item")]
    StorageFull,

    #[error("Entity {entity_id} cannot be stored, it has no storable component")]
    NotStorable { entity_id: u64 },
}
