use sectornet_serde::{ByteWrite, ByteWriter, Serde};

use crate::{messages::message_kind::MessageKind, types::EntityId};

/// A wire message with a fixed tag
pub trait Message: Serde {
    const KIND: MessageKind;
}

/// A message addressed to one entity, resolved by id on the receiving side
pub trait EntityUpdate: Message {
    fn entity_id(&self) -> EntityId;
}

/// Writes `[u16 LE tag][payload]` into `writer`
pub fn write_message<M: Message>(message: &M, writer: &mut dyn ByteWrite) {
    M::KIND.ser(writer);
    message.ser(writer);
}

/// Encodes a message into a fresh buffer
pub fn encode_message<M: Message>(message: &M) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(2 + message.byte_length());
    write_message(message, &mut writer);
    writer.to_bytes()
}

macro_rules! impl_message {
    ($message:ty, $kind:ident) => {
        impl $crate::messages::message::Message for $message {
            const KIND: $crate::messages::message_kind::MessageKind =
                $crate::messages::message_kind::MessageKind::$kind;
        }
    };
    ($message:ty, $kind:ident, entity_update) => {
        impl_message!($message, $kind);

        impl $crate::messages::message::EntityUpdate for $message {
            fn entity_id(&self) -> $crate::types::EntityId {
                self.entity_id
            }
        }
    };
}

pub(crate) use impl_message;
