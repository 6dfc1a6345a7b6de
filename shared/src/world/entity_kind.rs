use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    types::Vec3,
    world::{
        component::{
            BasicAnimComponent, Component, ComponentRegistry, HealthComponent, PortalComponent,
            StorableComponent, ToggleComponent,
        },
        storage::{ItemStack, StorageComponent},
    },
};

pub const PLAYER_INVENTORY_SLOTS: u16 = 20;
pub const FOOD_STACK_CLASS: &str = "food";
pub const FOOD_MAX_STACK: u32 = 20;

/// The closed set of entity types, with the data specific to each
#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    DestructibleDoor,
    StaticProp,
    Player { head_rotation: Vec3, color_hue: f32 },
    ItemPickup { items: Vec<ItemStack> },
    Food { food_name: String },
    PortalGate,
}

impl EntityKind {
    pub fn tag(&self) -> u8 {
        match self {
            EntityKind::DestructibleDoor => 0,
            EntityKind::StaticProp => 1,
            EntityKind::Player { .. } => 2,
            EntityKind::ItemPickup { .. } => 3,
            EntityKind::Food { .. } => 4,
            EntityKind::PortalGate => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::DestructibleDoor => "DestructibleDoor",
            EntityKind::StaticProp => "StaticProp",
            EntityKind::Player { .. } => "Player",
            EntityKind::ItemPickup { .. } => "ItemPickup",
            EntityKind::Food { .. } => "Food",
            EntityKind::PortalGate => "PortalGate",
        }
    }

    pub fn player(color_hue: f32) -> Self {
        EntityKind::Player {
            head_rotation: Vec3::ZERO,
            color_hue,
        }
    }

    /// Default component layout for this kind. Index order is part of the wire format.
    pub fn component_template(&self) -> ComponentRegistry {
        let layout = match self {
            EntityKind::DestructibleDoor => vec![
                (Component::Toggle(ToggleComponent::default()), false),
                (Component::Health(HealthComponent::default()), false),
            ],
            EntityKind::Player { .. } => vec![
                (Component::Health(HealthComponent::default()), true),
                (
                    Component::Storage(StorageComponent::new(PLAYER_INVENTORY_SLOTS)),
                    true,
                ),
                (Component::BasicAnim(BasicAnimComponent::default()), false),
            ],
            EntityKind::Food { .. } => vec![(
                Component::Storable(StorableComponent::stackable(
                    FOOD_STACK_CLASS,
                    FOOD_MAX_STACK,
                )),
                false,
            )],
            EntityKind::PortalGate => {
                vec![(Component::Portal(PortalComponent::default()), true)]
            }
            EntityKind::StaticProp | EntityKind::ItemPickup { .. } => Vec::new(),
        };
        ComponentRegistry::new(layout)
    }
}

impl Serde for EntityKind {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.tag().ser(writer);
        match self {
            EntityKind::Player {
                head_rotation,
                color_hue,
            } => {
                head_rotation.ser(writer);
                color_hue.ser(writer);
            }
            EntityKind::ItemPickup { items } => items.ser(writer),
            EntityKind::Food { food_name } => food_name.ser(writer),
            EntityKind::DestructibleDoor | EntityKind::StaticProp | EntityKind::PortalGate => {}
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        let kind = match tag {
            0 => EntityKind::DestructibleDoor,
            1 => EntityKind::StaticProp,
            2 => EntityKind::Player {
                head_rotation: Vec3::de(reader)?,
                color_hue: f32::de(reader)?,
            },
            3 => EntityKind::ItemPickup {
                items: Vec::de(reader)?,
            },
            4 => EntityKind::Food {
                food_name: String::de(reader)?,
            },
            5 => EntityKind::PortalGate,
            _ => {
                return Err(SerdeErr::InvalidTag {
                    type_name: "EntityKind",
                    tag: u16::from(tag),
                })
            }
        };
        Ok(kind)
    }
}
