use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    messages::message::impl_message,
    types::{EntityId, Vec3},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformUpdate {
    pub entity_id: EntityId,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Serde for TransformUpdate {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: EntityId::de(reader)?,
            position: Vec3::de(reader)?,
            rotation: Vec3::de(reader)?,
        })
    }
}

impl_message!(TransformUpdate, TransformUpdate, entity_update);

/// Transform of a player entity, including where the head is looking
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerTransform {
    pub entity_id: EntityId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub head_rotation: Vec3,
}

impl Serde for PlayerTransform {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
        self.head_rotation.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: EntityId::de(reader)?,
            position: Vec3::de(reader)?,
            rotation: Vec3::de(reader)?,
            head_rotation: Vec3::de(reader)?,
        })
    }
}

impl_message!(PlayerTransform, PlayerTransform, entity_update);
