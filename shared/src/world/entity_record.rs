use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    types::{ComponentIndex, EntityId, SectorId, Vec3},
    world::{
        component::{Component, ComponentKind, ComponentRegistry, OverwriteError},
        entity_kind::EntityKind,
        owners::Owners,
        storage::StorageComponent,
    },
};

/// Where a record currently lives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityHome {
    /// Not live: stored in an inventory, in a pickup, or in an unloaded sector
    #[default]
    Detached,
    /// Live on the server, in the given sector
    Sector(SectorId),
    /// Live in a client replica
    Client,
}

/// The replicated state of one game object
#[derive(Clone, Debug, PartialEq)]
pub struct EntityRecord {
    entity_id: EntityId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub owners: Owners,
    components: ComponentRegistry,
    home: EntityHome,
    in_save_state: bool,
    kind: EntityKind,
}

impl EntityRecord {
    /// A detached record with the kind's default components and no id yet
    pub fn new(kind: EntityKind) -> Self {
        let components = kind.component_template();
        Self {
            entity_id: 0,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            owners: Owners::none(),
            components,
            home: EntityHome::Detached,
            in_save_state: false,
            kind,
        }
    }

    pub fn with_transform(mut self, position: Vec3, rotation: Vec3) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }

    pub fn with_owners(mut self, owners: Owners) -> Self {
        self.owners = owners;
        self
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Assigns the id when the record is first spawned, and points every
    /// component back at it
    pub fn set_entity_id(&mut self, entity_id: EntityId) {
        self.entity_id = entity_id;
        self.components.initialize(entity_id);
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    pub fn home(&self) -> EntityHome {
        self.home
    }

    pub fn set_home(&mut self, home: EntityHome) {
        self.home = home;
    }

    pub fn sector(&self) -> Option<SectorId> {
        match self.home {
            EntityHome::Sector(sector_id) => Some(sector_id),
            _ => None,
        }
    }

    pub fn in_save_state(&self) -> bool {
        self.in_save_state
    }

    /// Save state includes save-only components when serializing
    pub fn set_save_state(&mut self, in_save_state: bool) {
        self.in_save_state = in_save_state;
    }

    pub fn set_transform(&mut self, position: Vec3, rotation: Vec3) {
        self.position = position;
        self.rotation = rotation;
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    pub fn component(&self, index: ComponentIndex) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn component_mut(&mut self, index: ComponentIndex) -> Option<&mut Component> {
        self.components.get_mut(index)
    }

    pub fn overwrite_component(
        &mut self,
        index: ComponentIndex,
        payload: &[u8],
    ) -> Result<ComponentKind, OverwriteError> {
        self.components.overwrite(index, payload)
    }

    pub fn storage(&self, index: ComponentIndex) -> Option<&StorageComponent> {
        self.component(index).and_then(Component::as_storage)
    }

    pub fn storage_mut(&mut self, index: ComponentIndex) -> Option<&mut StorageComponent> {
        self.component_mut(index)
            .and_then(Component::as_storage_mut)
    }

    /// Index of the first storage component
    pub fn storage_index(&self) -> Option<ComponentIndex> {
        self.components
            .find(ComponentKind::Storage)
            .map(|(index, _)| index)
    }

    /// The record as it should appear on disk: save-only components
    /// included, no live home
    pub fn to_saved(&self) -> Self {
        let mut saved = self.clone();
        saved.in_save_state = true;
        saved.home = EntityHome::Detached;
        saved
    }
}

impl Serde for EntityRecord {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.entity_id.ser(writer);
        self.kind.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
        self.owners.ser(writer);
        self.in_save_state.ser(writer);
        self.components.ser_with(writer, self.in_save_state);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        // records nest through stored items and pickups
        reader.enter()?;
        let record = Self::de_fields(reader);
        reader.leave();
        record
    }
}

impl EntityRecord {
    fn de_fields(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let entity_id = EntityId::de(reader)?;
        let kind = EntityKind::de(reader)?;
        let position = Vec3::de(reader)?;
        let rotation = Vec3::de(reader)?;
        let owners = Owners::de(reader)?;
        let in_save_state = bool::de(reader)?;
        let mut components = ComponentRegistry::de_with(reader, kind.component_template())?;
        components.initialize(entity_id);

        Ok(Self {
            entity_id,
            position,
            rotation,
            owners,
            components,
            home: EntityHome::Detached,
            in_save_state,
            kind,
        })
    }
}
