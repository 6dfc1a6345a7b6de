use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{messages::message::impl_message, types::EntityId};

/// Asks the server to carry the sender's player through node `portal_id`
/// of the portal holder `entity_id`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsePortal {
    pub entity_id: EntityId,
    pub portal_id: u8,
}

impl Serde for UsePortal {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
        self.portal_id.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: EntityId::de(reader)?,
            portal_id: u8::de(reader)?,
        })
    }
}

impl_message!(UsePortal, UsePortal, entity_update);
