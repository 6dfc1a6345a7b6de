//! # Sectornet Shared
//! Common functionality shared between sectornet-server & sectornet-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use sectornet_serde::{
    decode, decode_exact, encode, ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr, WriterPool,
    MAX_NESTING_DEPTH,
};

mod messages;
mod persistence;
mod protocol;
mod transport;
mod types;
mod world;

pub use messages::{
    commands::{ClientInitializer, DestroyEntity, SpawnEntity},
    component_overwrite::ComponentOverwriteUpdate,
    delivery::DeliveryMethod,
    dispatch::{decode_message, dispatch, peek_kind, Handles, MessageHandler, MessageOutcome},
    error::{DispatchError, DropReason, Rejection},
    login::{LoginPacket, LoginResponse},
    message::{encode_message, write_message, EntityUpdate, Message},
    message_kind::MessageKind,
    portal::UsePortal,
    storage::{StorageAction, StorageDrop},
    transform::{PlayerTransform, TransformUpdate},
};
pub use persistence::{load, save, PersistenceError};
pub use protocol::{Protocol, ProtocolError};
pub use transport::{IncomingQueue, PacketSender, ServerLink, TransportError};
pub use types::{
    ComponentIndex, EntityId, HostType, PeerId, SectorId, SectorParameters, Vec3, ANYONE,
};
pub use world::{
    authority::owns,
    component::{
        BasicAnimComponent, Component, ComponentKind, ComponentParent, ComponentRegistry,
        HealthComponent, OverwriteError, PortalComponent, PortalNode, StorableComponent,
        ToggleComponent,
    },
    entity_kind::{EntityKind, FOOD_MAX_STACK, FOOD_STACK_CLASS, PLAYER_INVENTORY_SLOTS},
    entity_record::{EntityHome, EntityRecord},
    events::{
        ComponentUpdatedEvent, EntityDestroyedEvent, EntitySpawnedEvent, HealthDepletedEvent,
        InventoryChangedEvent, TransformChangedEvent, WorldEvent, WorldEvents,
    },
    owners::Owners,
    scene::{HeadlessScene, LiveHandle, SceneSpawner},
    storage::{
        perform_storage_action, ItemStack, MoveKind, StorageActionError, StorageComponent,
        StorageError,
    },
};
