use sectornet_serde::{decode_exact, ByteReader, ByteWrite, Serde, SerdeErr};

use crate::world::{
    component::{
        BasicAnimComponent, ComponentKind, HealthComponent, PortalComponent, StorableComponent,
        ToggleComponent,
    },
    storage::StorageComponent,
};

/// The closed set of component types an entity can carry
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Toggle(ToggleComponent),
    Health(HealthComponent),
    Storage(StorageComponent),
    Storable(StorableComponent),
    BasicAnim(BasicAnimComponent),
    Portal(PortalComponent),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Toggle(_) => ComponentKind::Toggle,
            Component::Health(_) => ComponentKind::Health,
            Component::Storage(_) => ComponentKind::Storage,
            Component::Storable(_) => ComponentKind::Storable,
            Component::BasicAnim(_) => ComponentKind::BasicAnim,
            Component::Portal(_) => ComponentKind::Portal,
        }
    }

    /// Decodes a standalone component payload, as carried by an overwrite update
    pub fn from_payload(payload: &[u8]) -> Result<Self, SerdeErr> {
        decode_exact::<Component>(payload)
    }

    pub fn as_toggle(&self) -> Option<&ToggleComponent> {
        match self {
            Component::Toggle(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_toggle_mut(&mut self) -> Option<&mut ToggleComponent> {
        match self {
            Component::Toggle(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_health(&self) -> Option<&HealthComponent> {
        match self {
            Component::Health(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_health_mut(&mut self) -> Option<&mut HealthComponent> {
        match self {
            Component::Health(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_storage(&self) -> Option<&StorageComponent> {
        match self {
            Component::Storage(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_storage_mut(&mut self) -> Option<&mut StorageComponent> {
        match self {
            Component::Storage(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_storable(&self) -> Option<&StorableComponent> {
        match self {
            Component::Storable(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_basic_anim_mut(&mut self) -> Option<&mut BasicAnimComponent> {
        match self {
            Component::BasicAnim(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_portal(&self) -> Option<&PortalComponent> {
        match self {
            Component::Portal(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Serde for Component {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.kind().ser(writer);
        match self {
            Component::Toggle(inner) => inner.ser(writer),
            Component::Health(inner) => inner.ser(writer),
            Component::Storage(inner) => inner.ser(writer),
            Component::Storable(inner) => inner.ser(writer),
            Component::BasicAnim(inner) => inner.ser(writer),
            Component::Portal(inner) => inner.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let component = match ComponentKind::de(reader)? {
            ComponentKind::Toggle => Component::Toggle(ToggleComponent::de(reader)?),
            ComponentKind::Health => Component::Health(HealthComponent::de(reader)?),
            ComponentKind::Storage => Component::Storage(StorageComponent::de(reader)?),
            ComponentKind::Storable => Component::Storable(StorableComponent::de(reader)?),
            ComponentKind::BasicAnim => Component::BasicAnim(BasicAnimComponent::de(reader)?),
            ComponentKind::Portal => Component::Portal(PortalComponent::de(reader)?),
        };
        Ok(component)
    }
}
