use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::messages::delivery::DeliveryMethod;

/// The closed table of wire tags. The discriminant is the u16 written in
/// front of every message, so variants must never be reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum MessageKind {
    ClientInitializer = 0,
    TransformUpdate = 1,
    DestroyEntity = 2,
    SpawnEntity = 3,
    ComponentOverwriteUpdate = 4,
    StorageAction = 5,
    StorageDrop = 6,
    PlayerTransform = 7,
    UsePortal = 8,
}

impl MessageKind {
    pub const ALL: [MessageKind; 9] = [
        MessageKind::ClientInitializer,
        MessageKind::TransformUpdate,
        MessageKind::DestroyEntity,
        MessageKind::SpawnEntity,
        MessageKind::ComponentOverwriteUpdate,
        MessageKind::StorageAction,
        MessageKind::StorageDrop,
        MessageKind::PlayerTransform,
        MessageKind::UsePortal,
    ];

    pub fn tag(&self) -> u16 {
        *self as u16
    }

    pub fn from_tag(tag: u16) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Delivery used when the sender does not pick one
    pub fn default_delivery(&self) -> DeliveryMethod {
        match self {
            MessageKind::TransformUpdate | MessageKind::PlayerTransform => {
                DeliveryMethod::Unreliable
            }
            MessageKind::StorageAction => DeliveryMethod::ReliableOrdered,
            MessageKind::ClientInitializer
            | MessageKind::DestroyEntity
            | MessageKind::SpawnEntity
            | MessageKind::ComponentOverwriteUpdate
            | MessageKind::StorageDrop
            | MessageKind::UsePortal => DeliveryMethod::ReliableUnordered,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::ClientInitializer => "ClientInitializer",
            MessageKind::TransformUpdate => "TransformUpdate",
            MessageKind::DestroyEntity => "DestroyEntity",
            MessageKind::SpawnEntity => "SpawnEntity",
            MessageKind::ComponentOverwriteUpdate => "ComponentOverwriteUpdate",
            MessageKind::StorageAction => "StorageAction",
            MessageKind::StorageDrop => "StorageDrop",
            MessageKind::PlayerTransform => "PlayerTransform",
            MessageKind::UsePortal => "UsePortal",
        }
    }
}

impl Serde for MessageKind {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.tag().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u16::de(reader)?;
        Self::from_tag(tag).ok_or(SerdeErr::InvalidTag {
            type_name: "MessageKind",
            tag,
        })
    }

    fn byte_length(&self) -> usize {
        2
    }
}
