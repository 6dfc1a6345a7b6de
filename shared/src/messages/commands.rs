use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    messages::message::impl_message,
    types::{EntityId, SectorParameters},
    world::entity_record::EntityRecord,
};

/// Sent by the server when a peer enters a sector: everything the client needs
/// to build its replica
#[derive(Clone, Debug, PartialEq)]
pub struct ClientInitializer {
    pub player_entity_id: EntityId,
    pub entities: Vec<EntityRecord>,
    pub parameters: SectorParameters,
}

impl Serde for ClientInitializer {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.player_entity_id.ser(writer);
        self.entities.ser(writer);
        self.parameters.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            player_entity_id: EntityId::de(reader)?,
            entities: Vec::de(reader)?,
            parameters: SectorParameters::de(reader)?,
        })
    }
}

impl_message!(ClientInitializer, ClientInitializer);

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnEntity {
    pub record: EntityRecord,
}

impl Serde for SpawnEntity {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.record.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            record: EntityRecord::de(reader)?,
        })
    }
}

impl_message!(SpawnEntity, SpawnEntity);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyEntity {
    pub entity_id: EntityId,
}

impl Serde for DestroyEntity {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: EntityId::de(reader)?,
        })
    }
}

impl_message!(DestroyEntity, DestroyEntity, entity_update);
