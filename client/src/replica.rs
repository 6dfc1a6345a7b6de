use std::collections::{BTreeMap, HashMap};

use log::{debug, info};

use sectornet_shared::{
    owns, perform_storage_action, write_message, ClientInitializer, ComponentIndex, ComponentKind,
    ComponentOverwriteUpdate, EntityHome, EntityId, EntityKind, EntityRecord, HostType, ItemStack,
    LiveHandle, Message, MoveKind, OverwriteError, PeerId, PlayerTransform, Protocol,
    SceneSpawner, SectorParameters, ServerLink, StorageAction, StorageDrop, TransformUpdate,
    UsePortal, Vec3, WorldEvents, WriterPool,
};

use crate::SectornetClientError;

/// The client's copy of the sector it is in. Records arrive from the server;
/// owned entities can be changed locally and the change is sent upstream.
pub struct ClientReplica {
    peer_id: PeerId,
    player_entity_id: Option<EntityId>,
    parameters: SectorParameters,
    records: BTreeMap<EntityId, EntityRecord>,
    instances: HashMap<EntityId, LiveHandle>,
    protocol: Protocol,
    link: Box<dyn ServerLink>,
    pool: WriterPool,
    scene: Box<dyn SceneSpawner>,
    events: WorldEvents,
}

impl ClientReplica {
    pub fn new(
        peer_id: PeerId,
        protocol: Protocol,
        link: Box<dyn ServerLink>,
        scene: Box<dyn SceneSpawner>,
    ) -> Self {
        Self {
            peer_id,
            player_entity_id: None,
            parameters: SectorParameters::default(),
            records: BTreeMap::new(),
            instances: HashMap::new(),
            protocol,
            link,
            pool: WriterPool::default(),
            scene,
            events: WorldEvents::new(),
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    /// Entity the server gave this client to play, once initialized
    pub fn player_entity_id(&self) -> Option<EntityId> {
        self.player_entity_id
    }

    pub fn parameters(&self) -> &SectorParameters {
        &self.parameters
    }

    pub fn record(&self, entity_id: EntityId) -> Option<&EntityRecord> {
        self.records.get(&entity_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn instance(&self, entity_id: EntityId) -> Option<LiveHandle> {
        self.instances.get(&entity_id).copied()
    }

    pub fn owns(&self, entity_id: EntityId) -> bool {
        self.records
            .get(&entity_id)
            .map_or(false, |record| owns(self.peer_id, record))
    }

    pub fn events(&mut self) -> &mut WorldEvents {
        &mut self.events
    }

    /// Events raised since the last call
    pub fn take_events(&mut self) -> WorldEvents {
        std::mem::take(&mut self.events)
    }

    // Replication

    /// Replaces the whole replica with the contents of a sector the server
    /// just placed this client in
    pub fn initialize_scene(&mut self, initializer: ClientInitializer) {
        for (_, handle) in self.instances.drain() {
            self.scene.destroy(handle);
        }
        self.records.clear();

        self.player_entity_id = Some(initializer.player_entity_id);
        self.parameters = initializer.parameters;
        for record in initializer.entities {
            self.spawn_entity(record);
        }
        info!(
            "Joined sector with {} entities as entity {}",
            self.records.len(),
            initializer.player_entity_id
        );
    }

    /// Adds a record from the server, replacing any record with the same id
    pub fn spawn_entity(&mut self, mut record: EntityRecord) {
        let entity_id = record.entity_id();
        record.set_home(EntityHome::Client);
        record.set_save_state(false);

        let handle = self.scene.spawn_instance(&record, HostType::Client);
        if let Some(previous) = self.instances.insert(entity_id, handle) {
            self.scene.destroy(previous);
        }
        self.records.insert(entity_id, record);
        self.events.push_spawn(entity_id);
    }

    pub fn destroy_entity(&mut self, entity_id: EntityId) -> Option<EntityRecord> {
        let mut record = self.records.remove(&entity_id)?;
        if let Some(handle) = self.instances.remove(&entity_id) {
            self.scene.destroy(handle);
        }
        record.set_home(EntityHome::Detached);
        self.events.push_destroy(entity_id);
        Some(record)
    }

    /// Applies a transform the server sent
    pub fn apply_transform(&mut self, entity_id: EntityId, position: Vec3, rotation: Vec3) -> bool {
        let Some(record) = self.records.get_mut(&entity_id) else {
            return false;
        };
        record.set_transform(position, rotation);
        if let Some(handle) = self.instances.get(&entity_id) {
            self.scene.apply_transform(*handle, position, rotation);
        }
        self.events.push_transform(entity_id);
        true
    }

    pub(crate) fn set_head_rotation(&mut self, entity_id: EntityId, rotation: Vec3) {
        if let Some(record) = self.records.get_mut(&entity_id) {
            if let EntityKind::Player { head_rotation, .. } = record.kind_mut() {
                *head_rotation = rotation;
            }
        }
    }

    /// Applies a component overwrite the server sent
    pub fn apply_overwrite(
        &mut self,
        update: &ComponentOverwriteUpdate,
    ) -> Option<Result<ComponentKind, OverwriteError>> {
        let record = self.records.get_mut(&update.entity_id)?;
        let result = record.overwrite_component(update.component_index, &update.payload);
        if let Ok(kind) = &result {
            let (entity_id, index) = (update.entity_id, update.component_index);
            self.events.push_component_update(entity_id, index, *kind);
            match kind {
                ComponentKind::Storage => self.events.push_inventory_change(entity_id, index),
                ComponentKind::Health => {
                    let depleted = record
                        .component(index)
                        .and_then(|component| component.as_health())
                        .filter(|health| health.is_depleted());
                    if let Some(health) = depleted {
                        self.events.push_health_depleted(entity_id, health.health);
                    }
                }
                _ => {}
            }
        }
        Some(result)
    }

    // Owned entities

    fn owned_record_mut(
        &mut self,
        entity_id: EntityId,
    ) -> Result<&mut EntityRecord, SectornetClientError> {
        let peer_id = self.peer_id;
        let record = self
            .records
            .get_mut(&entity_id)
            .ok_or(SectornetClientError::UnknownEntity(entity_id))?;
        if !owns(peer_id, record) {
            return Err(SectornetClientError::NotOwner(entity_id));
        }
        Ok(record)
    }

    /// Moves an owned entity locally and tells the server
    pub fn update_transform(
        &mut self,
        entity_id: EntityId,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<(), SectornetClientError> {
        self.owned_record_mut(entity_id)?
            .set_transform(position, rotation);
        if let Some(handle) = self.instances.get(&entity_id) {
            self.scene.apply_transform(*handle, position, rotation);
        }
        self.send(&TransformUpdate {
            entity_id,
            position,
            rotation,
        })
    }

    /// Moves this client's player, head included
    pub fn update_player_transform(
        &mut self,
        position: Vec3,
        rotation: Vec3,
        head_rotation: Vec3,
    ) -> Result<(), SectornetClientError> {
        let entity_id = self
            .player_entity_id
            .ok_or(SectornetClientError::UnknownEntity(0))?;
        self.owned_record_mut(entity_id)?
            .set_transform(position, rotation);
        self.set_head_rotation(entity_id, head_rotation);
        if let Some(handle) = self.instances.get(&entity_id) {
            self.scene.apply_transform(*handle, position, rotation);
        }
        self.send(&PlayerTransform {
            entity_id,
            position,
            rotation,
            head_rotation,
        })
    }

    /// Performs a storage move locally and queues the same move for the
    /// server, which answers with the authoritative storage state
    pub fn move_storage(&mut self, action: StorageAction) -> Result<MoveKind, SectornetClientError> {
        self.owned_record_mut(action.source_entity)?;
        self.owned_record_mut(action.dest_entity)?;

        let kind = perform_storage_action(&mut self.records, &action)?;
        self.events
            .push_inventory_change(action.source_entity, action.source_component);
        self.events
            .push_inventory_change(action.dest_entity, action.dest_component);
        self.send(&action)?;
        Ok(kind)
    }

    /// Drops a stack out of an owned storage. The server puts it on the ground.
    pub fn drop_item(
        &mut self,
        entity_id: EntityId,
        index: ComponentIndex,
        slot: u16,
    ) -> Result<ItemStack, SectornetClientError> {
        let storage = self
            .owned_record_mut(entity_id)?
            .storage_mut(index)
            .ok_or(SectornetClientError::NotAStorage { entity_id, index })?;
        let stack = storage.drop_slot(slot)?;
        self.events.push_inventory_change(entity_id, index);
        self.send(&StorageDrop {
            entity_id,
            component_index: index,
            slot,
        })?;
        Ok(stack)
    }

    /// Flips an owned toggle and sends it. Returns the new state.
    pub fn toggle(&mut self, entity_id: EntityId) -> Result<bool, SectornetClientError> {
        let (index, state) = {
            let record = self.owned_record_mut(entity_id)?;
            let (index, component) = record
                .components_mut()
                .find_mut(ComponentKind::Toggle)
                .ok_or(SectornetClientError::MissingComponent {
                    entity_id,
                    kind: ComponentKind::Toggle,
                })?;
            let state = component.as_toggle_mut().map_or(false, |toggle| toggle.toggle());
            (index, state)
        };
        self.events
            .push_component_update(entity_id, index, ComponentKind::Toggle);
        self.net_update_component(entity_id, index)?;
        Ok(state)
    }

    /// Sets the animation an owned entity is playing and sends it
    pub fn set_animation(&mut self, entity_id: EntityId, animation: u8) -> Result<(), SectornetClientError> {
        let index = {
            let record = self.owned_record_mut(entity_id)?;
            let (index, component) = record
                .components_mut()
                .find_mut(ComponentKind::BasicAnim)
                .ok_or(SectornetClientError::MissingComponent {
                    entity_id,
                    kind: ComponentKind::BasicAnim,
                })?;
            if let Some(anim) = component.as_basic_anim_mut() {
                anim.current_animation = animation;
            }
            index
        };
        self.events
            .push_component_update(entity_id, index, ComponentKind::BasicAnim);
        self.net_update_component(entity_id, index)
    }

    /// Asks the server to carry this client's player through a portal node
    pub fn use_portal(&mut self, holder: EntityId, portal_id: u8) -> Result<(), SectornetClientError> {
        if !self.records.contains_key(&holder) {
            return Err(SectornetClientError::UnknownEntity(holder));
        }
        self.send(&UsePortal {
            entity_id: holder,
            portal_id,
        })
    }

    /// Sends a component's current local state to the server
    pub fn net_update_component(
        &mut self,
        entity_id: EntityId,
        index: ComponentIndex,
    ) -> Result<(), SectornetClientError> {
        let payload = self
            .records
            .get(&entity_id)
            .ok_or(SectornetClientError::UnknownEntity(entity_id))?
            .components()
            .payload(index)
            .ok_or(SectornetClientError::UnknownEntity(entity_id))?;
        self.send(&ComponentOverwriteUpdate {
            entity_id,
            component_index: index,
            payload,
        })
    }

    fn send<M: Message>(&mut self, message: &M) -> Result<(), SectornetClientError> {
        let mut writer = self.pool.checkout();
        write_message(message, &mut writer);

        let max = self.protocol.max_payload_bytes;
        let result = if writer.len() > max {
            Err(SectornetClientError::Oversized {
                len: writer.len(),
                max,
            })
        } else {
            let delivery = self.protocol.delivery_for(M::KIND);
            debug!("Sending {:?} ({} bytes)", M::KIND, writer.len());
            self.link
                .send(writer.as_slice(), delivery)
                .map_err(SectornetClientError::from)
        };

        self.pool.recycle(writer);
        result
    }
}
