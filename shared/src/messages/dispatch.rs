use log::warn;

use sectornet_serde::{ByteReader, Serde, SerdeErr};

use crate::messages::{
    commands::{ClientInitializer, DestroyEntity, SpawnEntity},
    component_overwrite::ComponentOverwriteUpdate,
    error::{DispatchError, DropReason, Rejection},
    message::Message,
    message_kind::MessageKind,
    portal::UsePortal,
    storage::{StorageAction, StorageDrop},
    transform::{PlayerTransform, TransformUpdate},
};

/// Final state of one received message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Applied,
    Rejected(Rejection),
    Dropped(DropReason),
}

impl MessageOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MessageOutcome::Applied)
    }

    pub fn wrong_role(kind: MessageKind) -> Self {
        MessageOutcome::Dropped(DropReason::WrongRole(kind))
    }
}

impl From<Rejection> for MessageOutcome {
    fn from(rejection: Rejection) -> Self {
        MessageOutcome::Rejected(rejection)
    }
}

impl From<DropReason> for MessageOutcome {
    fn from(reason: DropReason) -> Self {
        MessageOutcome::Dropped(reason)
    }
}

/// Role-side handling of one message type
pub trait Handles<M: Message> {
    fn handle(&mut self, message: M) -> MessageOutcome;
}

/// A handler for every message kind
pub trait MessageHandler:
    Handles<ClientInitializer>
    + Handles<TransformUpdate>
    + Handles<DestroyEntity>
    + Handles<SpawnEntity>
    + Handles<ComponentOverwriteUpdate>
    + Handles<StorageAction>
    + Handles<StorageDrop>
    + Handles<PlayerTransform>
    + Handles<UsePortal>
{
}

impl<H> MessageHandler for H where
    H: Handles<ClientInitializer>
        + Handles<TransformUpdate>
        + Handles<DestroyEntity>
        + Handles<SpawnEntity>
        + Handles<ComponentOverwriteUpdate>
        + Handles<StorageAction>
        + Handles<StorageDrop>
        + Handles<PlayerTransform>
        + Handles<UsePortal>
{
}

/// Reads the tag of `bytes`, decodes the tagged message and hands it to
/// `handler`. Unknown tags and malformed payloads are dropped with a warning.
pub fn dispatch<H: MessageHandler>(bytes: &[u8], handler: &mut H) -> MessageOutcome {
    let mut reader = ByteReader::new(bytes);
    let kind = match read_kind(&mut reader) {
        Ok(kind) => kind,
        Err(error) => return drop_malformed(error),
    };

    match kind {
        MessageKind::ClientInitializer => route::<ClientInitializer, H>(&mut reader, handler),
        MessageKind::TransformUpdate => route::<TransformUpdate, H>(&mut reader, handler),
        MessageKind::DestroyEntity => route::<DestroyEntity, H>(&mut reader, handler),
        MessageKind::SpawnEntity => route::<SpawnEntity, H>(&mut reader, handler),
        MessageKind::ComponentOverwriteUpdate => {
            route::<ComponentOverwriteUpdate, H>(&mut reader, handler)
        }
        MessageKind::StorageAction => route::<StorageAction, H>(&mut reader, handler),
        MessageKind::StorageDrop => route::<StorageDrop, H>(&mut reader, handler),
        MessageKind::PlayerTransform => route::<PlayerTransform, H>(&mut reader, handler),
        MessageKind::UsePortal => route::<UsePortal, H>(&mut reader, handler),
    }
}

/// Reads only the tag, for logging and size checks
pub fn peek_kind(bytes: &[u8]) -> Result<MessageKind, DispatchError> {
    read_kind(&mut ByteReader::new(bytes))
}

/// Decodes a full `[tag][payload]` buffer as `M`
pub fn decode_message<M: Message>(bytes: &[u8]) -> Result<M, DispatchError> {
    let mut reader = ByteReader::new(bytes);
    let kind = read_kind(&mut reader)?;
    if kind != M::KIND {
        return Err(DispatchError::Malformed {
            kind: M::KIND,
            source: SerdeErr::InvalidTag {
                type_name: M::KIND.name(),
                tag: kind.tag(),
            },
        });
    }
    read_body::<M>(&mut reader)
}

fn read_kind(reader: &mut ByteReader) -> Result<MessageKind, DispatchError> {
    if reader.remaining() < 2 {
        return Err(DispatchError::MissingTag {
            len: reader.remaining(),
        });
    }
    let tag = u16::de(reader).map_err(|_| DispatchError::MissingTag { len: 0 })?;
    MessageKind::from_tag(tag).ok_or(DispatchError::UnknownTag { tag })
}

fn read_body<M: Message>(reader: &mut ByteReader) -> Result<M, DispatchError> {
    let malformed = |source| DispatchError::Malformed {
        kind: M::KIND,
        source,
    };
    let message = M::de(reader).map_err(malformed)?;
    if !reader.is_empty() {
        return Err(malformed(SerdeErr::TrailingBytes {
            trailing: reader.remaining(),
        }));
    }
    Ok(message)
}

fn route<M: Message, H: Handles<M>>(reader: &mut ByteReader, handler: &mut H) -> MessageOutcome {
    match read_body::<M>(reader) {
        Ok(message) => handler.handle(message),
        Err(error) => drop_malformed(error),
    }
}

fn drop_malformed(error: DispatchError) -> MessageOutcome {
    warn!("Dropping packet: {}", error);
    MessageOutcome::Dropped(DropReason::Dispatch(error))
}
