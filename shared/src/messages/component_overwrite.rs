use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    messages::message::impl_message,
    types::{ComponentIndex, EntityId},
};

/// Replaces one component of an entity with the serialized form in `payload`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentOverwriteUpdate {
    pub entity_id: EntityId,
    pub component_index: ComponentIndex,
    pub payload: Vec<u8>,
}

impl Serde for ComponentOverwriteUpdate {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
        self.component_index.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: EntityId::de(reader)?,
            component_index: ComponentIndex::de(reader)?,
            payload: Vec::de(reader)?,
        })
    }
}

impl_message!(ComponentOverwriteUpdate, ComponentOverwriteUpdate, entity_update);
