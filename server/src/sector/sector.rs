use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use sectornet_shared::{
    ClientInitializer, ComponentIndex, ComponentKind, ComponentOverwriteUpdate, DeliveryMethod,
    DestroyEntity, EntityHome, EntityId, EntityRecord, HostType, LiveHandle, Message, Owners,
    PeerId, SceneSpawner, SectorId, SectorParameters, SpawnEntity, Vec3,
};

use crate::{io::Io, sector::SectorSnapshot};

/// A loaded area of the world: the records that live in it, their live
/// instances, and the peers that receive its broadcasts
pub struct Sector {
    id: SectorId,
    parameters: SectorParameters,
    records: BTreeMap<EntityId, EntityRecord>,
    instances: HashMap<EntityId, LiveHandle>,
    peers: BTreeSet<PeerId>,
}

impl Sector {
    pub fn new(id: SectorId, parameters: SectorParameters) -> Self {
        Self {
            id,
            parameters,
            records: BTreeMap::new(),
            instances: HashMap::new(),
            peers: BTreeSet::new(),
        }
    }

    /// Rebuilds a sector from disk. Records are homed here but not yet
    /// instanced, see [`Sector::reload_area`].
    pub fn from_snapshot(snapshot: SectorSnapshot) -> Self {
        let mut sector = Self::new(snapshot.sector_id, snapshot.parameters);
        for mut record in snapshot.records {
            record.set_home(EntityHome::Sector(sector.id));
            record.set_save_state(false);
            sector.records.insert(record.entity_id(), record);
        }
        sector
    }

    pub fn id(&self) -> SectorId {
        self.id
    }

    pub fn parameters(&self) -> &SectorParameters {
        &self.parameters
    }

    pub fn record(&self, entity_id: EntityId) -> Option<&EntityRecord> {
        self.records.get(&entity_id)
    }

    pub fn record_mut(&mut self, entity_id: EntityId) -> Option<&mut EntityRecord> {
        self.records.get_mut(&entity_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    pub(crate) fn records_mut(&mut self) -> &mut BTreeMap<EntityId, EntityRecord> {
        &mut self.records
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.records.contains_key(&entity_id)
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

    pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.peers.iter().copied()
    }

    pub fn has_peer(&self, peer: PeerId) -> bool {
        self.peers.contains(&peer)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    // Broadcast

    /// Sends `message` to every peer in the sector except `except`. The
    /// message is encoded once. Returns the number of sends.
    pub fn echo_to_sector<M: Message>(
        &self,
        io: &mut Io,
        message: &M,
        delivery: DeliveryMethod,
        except: Option<PeerId>,
    ) -> usize {
        let targets = self.peers().filter(|peer| Some(*peer) != except);
        io.broadcast(targets, message, delivery)
    }

    /// Sends `message` to the sector peers listed in `owners`, or to the
    /// whole sector when `owners` contains the anyone sentinel
    pub fn echo_to_owners<M: Message>(
        &self,
        io: &mut Io,
        owners: &Owners,
        message: &M,
        delivery: DeliveryMethod,
    ) -> usize {
        if owners.contains_anyone() {
            return self.echo_to_sector(io, message, delivery, None);
        }
        let targets = self.peers().filter(|peer| owners.contains(*peer));
        io.broadcast(targets, message, delivery)
    }

    // Entities

    /// Instances a freshly spawned record and announces it to the sector
    pub fn insert_entity(
        &mut self,
        record: EntityRecord,
        io: &mut Io,
        scene: &mut dyn SceneSpawner,
    ) {
        let entity_id = record.entity_id();
        self.instance_entity(record, io, scene);
        if let Some(record) = self.records.get(&entity_id) {
            let spawn = SpawnEntity {
                record: record.clone(),
            };
            self.echo_to_sector(io, &spawn, DeliveryMethod::ReliableUnordered, None);
        }
    }

    /// Makes a record live in this sector and shares its private components
    /// with the peers that own it
    pub fn instance_entity(
        &mut self,
        mut record: EntityRecord,
        io: &mut Io,
        scene: &mut dyn SceneSpawner,
    ) {
        let entity_id = record.entity_id();
        record.set_home(EntityHome::Sector(self.id));
        record.set_save_state(false);

        let handle = scene.spawn_instance(&record, HostType::Server);
        if let Some(previous) = self.instances.insert(entity_id, handle) {
            scene.destroy(previous);
        }
        self.records.insert(entity_id, record);

        for peer in self.peers.iter() {
            self.meet_entity(io, *peer, entity_id);
        }
    }

    /// Removes a record and its instance, telling every peer it is gone.
    /// The returned record is detached.
    pub fn remove_entity(
        &mut self,
        entity_id: EntityId,
        io: &mut Io,
        scene: &mut dyn SceneSpawner,
    ) -> Option<EntityRecord> {
        let mut record = self.records.remove(&entity_id)?;
        if let Some(handle) = self.instances.remove(&entity_id) {
            if let Some((position, rotation)) = scene.read_transform(handle) {
                record.set_transform(position, rotation);
            }
            scene.destroy(handle);
        }
        record.set_home(EntityHome::Detached);

        self.echo_to_sector(
            io,
            &DestroyEntity { entity_id },
            DeliveryMethod::ReliableUnordered,
            None,
        );
        Some(record)
    }

    /// Instances every record, as after loading from disk
    pub fn reload_area(&mut self, io: &mut Io, scene: &mut dyn SceneSpawner) {
        let records: Vec<EntityRecord> = std::mem::take(&mut self.records).into_values().collect();
        for record in records {
            self.instance_entity(record, io, scene);
        }
    }

    /// Applies a transform to a record and its live instance
    pub fn apply_transform(
        &mut self,
        entity_id: EntityId,
        position: Vec3,
        rotation: Vec3,
        scene: &mut dyn SceneSpawner,
    ) -> bool {
        let Some(record) = self.records.get_mut(&entity_id) else {
            return false;
        };
        record.set_transform(position, rotation);
        if let Some(handle) = self.instances.get(&entity_id) {
            scene.apply_transform(*handle, position, rotation);
        }
        true
    }

    /// Copies live transforms back into the records
    pub fn flush_transforms(&mut self, scene: &dyn SceneSpawner) {
        for (entity_id, handle) in self.instances.iter() {
            let Some(record) = self.records.get_mut(entity_id) else {
                continue;
            };
            if let Some((position, rotation)) = scene.read_transform(*handle) {
                record.set_transform(position, rotation);
            }
        }
    }

    /// Save form of the sector, taken while it stays loaded
    pub fn snapshot(&mut self, scene: &dyn SceneSpawner) -> SectorSnapshot {
        self.flush_transforms(scene);
        SectorSnapshot {
            sector_id: self.id,
            parameters: self.parameters,
            records: self.records.values().map(EntityRecord::to_saved).collect(),
        }
    }

    /// Flushes live transforms, destroys every instance and detaches every
    /// record, consuming the sector
    pub fn unload(mut self, scene: &mut dyn SceneSpawner) -> SectorSnapshot {
        self.flush_transforms(scene);
        for (_, handle) in self.instances.drain() {
            scene.destroy(handle);
        }
        let records = self
            .records
            .into_values()
            .map(|mut record| {
                record.set_home(EntityHome::Detached);
                record.set_save_state(true);
                record
            })
            .collect();
        SectorSnapshot {
            sector_id: self.id,
            parameters: self.parameters,
            records,
        }
    }

    // Peers

    /// Adds a peer, sends it the sector contents and its private component state
    pub fn player_connect(&mut self, peer: PeerId, player_entity_id: EntityId, io: &mut Io) {
        self.peers.insert(peer);
        let initializer = ClientInitializer {
            player_entity_id,
            entities: self.records.values().cloned().collect(),
            parameters: self.parameters,
        };
        io.send_message(peer, &initializer, DeliveryMethod::ReliableUnordered);
        self.on_meet(io, peer);
    }

    /// Removes a peer, flushing its player's transform into the record first
    pub fn player_disconnect(
        &mut self,
        peer: PeerId,
        player_entity_id: EntityId,
        scene: &dyn SceneSpawner,
    ) {
        if let (Some(handle), Some(record)) = (
            self.instances.get(&player_entity_id),
            self.records.get_mut(&player_entity_id),
        ) {
            if let Some((position, rotation)) = scene.read_transform(*handle) {
                record.set_transform(position, rotation);
            }
        }
        self.peers.remove(&peer);
    }

    /// Sends `peer` the private components of every entity it owns
    pub fn on_meet(&self, io: &mut Io, peer: PeerId) {
        for entity_id in self.records.keys() {
            self.meet_entity(io, peer, *entity_id);
        }
    }

    fn meet_entity(&self, io: &mut Io, peer: PeerId, entity_id: EntityId) {
        let Some(record) = self.records.get(&entity_id) else {
            return;
        };
        if !record.owners.permits(peer) {
            return;
        }
        let registry = record.components();
        for (index, component) in registry.iter() {
            if !registry.is_save_only(index) {
                continue;
            }
            let delivery = match component.kind() {
                ComponentKind::Storage => DeliveryMethod::ReliableOrdered,
                _ => DeliveryMethod::Unreliable,
            };
            self.net_update_peer(io, peer, entity_id, index, delivery);
        }
    }

    // Components

    /// Pushes a component's current state as an overwrite. Save-only
    /// components only ever go to owners.
    pub fn net_update_component(
        &self,
        io: &mut Io,
        entity_id: EntityId,
        index: ComponentIndex,
        owners_only: bool,
        delivery: DeliveryMethod,
    ) -> usize {
        let Some((record, update)) = self.overwrite_for(entity_id, index) else {
            debug!("No component {} on entity {} to net update", index, entity_id);
            return 0;
        };
        if owners_only || record.components().is_save_only(index) {
            self.echo_to_owners(io, &record.owners, &update, delivery)
        } else {
            self.echo_to_sector(io, &update, delivery, None)
        }
    }

    /// Pushes a component's current state to one peer
    pub fn net_update_peer(
        &self,
        io: &mut Io,
        peer: PeerId,
        entity_id: EntityId,
        index: ComponentIndex,
        delivery: DeliveryMethod,
    ) -> bool {
        match self.overwrite_for(entity_id, index) {
            Some((_, update)) => io.send_message(peer, &update, delivery),
            None => false,
        }
    }

    fn overwrite_for(
        &self,
        entity_id: EntityId,
        index: ComponentIndex,
    ) -> Option<(&EntityRecord, ComponentOverwriteUpdate)> {
        let record = self.records.get(&entity_id)?;
        let payload = record.components().payload(index)?;
        Some((
            record,
            ComponentOverwriteUpdate {
                entity_id,
                component_index: index,
                payload,
            },
        ))
    }
}
