use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    messages::message::impl_message,
    types::{ComponentIndex, EntityId},
};

/// Moves items from a slot of one storage component to a slot of another
/// (or the same) storage component
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageAction {
    pub source_entity: EntityId,
    pub dest_entity: EntityId,
    pub source_slot: u16,
    pub dest_slot: u16,
    pub count: u32,
    pub source_component: ComponentIndex,
    pub dest_component: ComponentIndex,
}

impl StorageAction {
    pub fn is_within_one_storage(&self) -> bool {
        self.source_entity == self.dest_entity && self.source_component == self.dest_component
    }
}

impl Serde for StorageAction {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.source_entity.ser(writer);
        self.dest_entity.ser(writer);
        self.source_slot.ser(writer);
        self.dest_slot.ser(writer);
        self.count.ser(writer);
        self.source_component.ser(writer);
        self.dest_component.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            source_entity: EntityId::de(reader)?,
            dest_entity: EntityId::de(reader)?,
            source_slot: u16::de(reader)?,
            dest_slot: u16::de(reader)?,
            count: u32::de(reader)?,
            source_component: ComponentIndex::de(reader)?,
            dest_component: ComponentIndex::de(reader)?,
        })
    }
}

impl_message!(StorageAction, StorageAction);

/// Drops the stack in `slot` out of a storage component into the world
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageDrop {
    pub entity_id: EntityId,
    pub component_index: ComponentIndex,
    pub slot: u16,
}

impl Serde for StorageDrop {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
        self.component_index.ser(writer);
        self.slot.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: EntityId::de(reader)?,
            component_index: ComponentIndex::de(reader)?,
            slot: u16::de(reader)?,
        })
    }
}

impl_message!(StorageDrop, StorageDrop, entity_update);
