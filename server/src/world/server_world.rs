use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use sectornet_shared::{
    load, save, ComponentIndex, ComponentKind, DeliveryMethod, EntityId, EntityKind,
    EntityRecord, ItemStack, LoginPacket, Owners, PeerId, Protocol, Rejection, SceneSpawner,
    SectorId, SectorParameters, SpawnEntity, StorageComponent, TransformUpdate, Vec3,
    WorldEvents,
};

use crate::{
    error::{EntityActionError, SectornetServerError},
    io::Io,
    login::{password_digest, LoginRejection},
    sector::{Sector, SectorSnapshot},
    server_config::ServerConfig,
    world::world_data::{PlayerData, SectorMetadata, WorldData},
};

const WORLD_FILE: &str = "world.dat";
const SECTOR_DIRECTORY: &str = "sectors";

/// The authoritative world: persisted world data, loaded sectors, connected
/// peers, and the outbound socket
pub struct ServerWorld {
    config: ServerConfig,
    protocol: Protocol,
    data: WorldData,
    sectors: BTreeMap<SectorId, Sector>,
    active: BTreeMap<PeerId, SectorId>,
    io: Io,
    scene: Box<dyn SceneSpawner>,
    events: WorldEvents,
}

impl ServerWorld {
    /// Loads `world.dat` from the save directory when there is one, otherwise
    /// starts a fresh world with an empty home sector
    pub fn new(
        config: ServerConfig,
        protocol: Protocol,
        io: Io,
        scene: Box<dyn SceneSpawner>,
    ) -> Result<Self, SectornetServerError> {
        let data = match world_path(&config) {
            Some(path) if path.exists() => {
                load::<WorldData>(&path).map_err(SectornetServerError::WorldLoad)?
            }
            _ => WorldData::default(),
        };

        let mut world = Self {
            config,
            protocol,
            data,
            sectors: BTreeMap::new(),
            active: BTreeMap::new(),
            io,
            scene,
            events: WorldEvents::new(),
        };

        match world.data.home_sector {
            Some(home) => world.load_sector(home)?,
            None => {
                let name = world.config.home_sector_name.clone();
                let home = world.add_new_sector(&name, SectorParameters::default());
                world.data.home_sector = Some(home);
            }
        }

        Ok(world)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn data(&self) -> &WorldData {
        &self.data
    }

    pub fn events(&mut self) -> &mut WorldEvents {
        &mut self.events
    }

    pub(crate) fn take_events(&mut self) -> WorldEvents {
        std::mem::take(&mut self.events)
    }

    pub fn sector(&self, sector_id: SectorId) -> Option<&Sector> {
        self.sectors.get(&sector_id)
    }

    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.values()
    }

    /// The live record of an entity, if its sector is loaded
    pub fn record(&self, entity_id: EntityId) -> Option<&EntityRecord> {
        let sector_id = self.data.sector_of(entity_id)?;
        self.sectors.get(&sector_id)?.record(entity_id)
    }

    /// Direct access to a live record. Changes reach clients only through
    /// [`ServerWorld::net_update_component`] or a respawn.
    pub fn entity_mut(&mut self, entity_id: EntityId) -> Option<&mut EntityRecord> {
        let sector_id = self.data.sector_of(entity_id)?;
        self.sectors.get_mut(&sector_id)?.record_mut(entity_id)
    }

    pub fn is_active(&self, peer: PeerId) -> bool {
        self.active.contains_key(&peer)
    }

    pub fn active_sector(&self, peer: PeerId) -> Option<SectorId> {
        self.active.get(&peer).copied()
    }

    pub fn active_peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.active.keys().copied()
    }

    /// Entity id of the peer's player
    pub fn player_entity(&self, peer: PeerId) -> Option<EntityId> {
        self.data.player(peer).map(|player| player.entity_id)
    }

    /// Disjoint borrows of a loaded sector and the collaborators handlers need
    pub(crate) fn sector_parts(
        &mut self,
        sector_id: SectorId,
    ) -> Option<(&mut Sector, &mut Io, &mut dyn SceneSpawner, &mut WorldEvents)> {
        let sector = self.sectors.get_mut(&sector_id)?;
        Some((sector, &mut self.io, self.scene.as_mut(), &mut self.events))
    }

    // Sector Management

    /// Registers and loads a new empty sector
    pub fn add_new_sector(&mut self, name: &str, parameters: SectorParameters) -> SectorId {
        let sector_id = self.data.next_sector_id();
        self.data.sectors.insert(
            sector_id,
            SectorMetadata {
                name: name.to_string(),
                parameters,
            },
        );
        self.sectors
            .insert(sector_id, Sector::new(sector_id, parameters));
        info!("Created sector {} ({})", sector_id, name);
        sector_id
    }

    /// Brings a sector into memory, from its save file if one exists, and
    /// instances every record in it
    pub fn load_sector(&mut self, sector_id: SectorId) -> Result<(), SectornetServerError> {
        if self.sectors.contains_key(&sector_id) {
            return Ok(());
        }
        let Some(metadata) = self.data.sector_metadata(sector_id) else {
            return Err(SectornetServerError::UnknownSector(sector_id));
        };

        let mut sector = match self.sector_path(sector_id) {
            Some(path) if path.exists() => {
                let snapshot = load::<SectorSnapshot>(&path).map_err(|source| {
                    SectornetServerError::SectorPersistence { sector_id, source }
                })?;
                Sector::from_snapshot(snapshot)
            }
            _ => Sector::new(sector_id, metadata.parameters),
        };
        sector.reload_area(&mut self.io, self.scene.as_mut());

        for record in sector.records() {
            self.data.directory.insert(record.entity_id(), sector_id);
        }
        info!("Loaded sector {} with {} entities", sector_id, sector.len());
        self.sectors.insert(sector_id, sector);
        Ok(())
    }

    /// Writes a loaded sector to disk. Without a save directory this does nothing.
    pub fn save_sector(&mut self, sector_id: SectorId) -> Result<(), SectornetServerError> {
        let Some(path) = self.sector_path(sector_id) else {
            return Ok(());
        };
        let Some(sector) = self.sectors.get_mut(&sector_id) else {
            return Err(SectornetServerError::UnknownSector(sector_id));
        };
        let snapshot = sector.snapshot(self.scene.as_ref());
        save(&path, &snapshot)
            .map_err(|source| SectornetServerError::SectorPersistence { sector_id, source })
    }

    /// Flushes, saves and drops a sector. Refused while peers are in it.
    pub fn unload_sector(&mut self, sector_id: SectorId) -> Result<(), SectornetServerError> {
        let Some(sector) = self.sectors.get(&sector_id) else {
            return Ok(());
        };
        if sector.peer_count() > 0 {
            return Err(SectornetServerError::SectorOccupied {
                sector_id,
                peers: sector.peer_count(),
            });
        }
        let Some(sector) = self.sectors.remove(&sector_id) else {
            return Ok(());
        };

        let snapshot = sector.unload(self.scene.as_mut());
        if let Some(path) = self.sector_path(sector_id) {
            save(&path, &snapshot)
                .map_err(|source| SectornetServerError::SectorPersistence { sector_id, source })?;
        }
        info!("Unloaded sector {}", sector_id);
        Ok(())
    }

    /// Saves every loaded sector and then `world.dat`
    pub fn save_world(&mut self) -> Result<(), SectornetServerError> {
        let Some(path) = world_path(&self.config) else {
            return Ok(());
        };
        let loaded: Vec<SectorId> = self.sectors.keys().copied().collect();
        for sector_id in loaded {
            self.save_sector(sector_id)?;
        }
        save(&path, &self.data).map_err(SectornetServerError::WorldSave)?;
        info!("Saved world to {}", path.display());
        Ok(())
    }

    fn sector_path(&self, sector_id: SectorId) -> Option<PathBuf> {
        self.config.save_directory.as_ref().map(|directory| {
            directory
                .join(SECTOR_DIRECTORY)
                .join(format!("{}.dat", sector_id))
        })
    }

    // Entity Management

    /// Gives `record` a fresh id and makes it live in `sector_id`, announcing
    /// it to the sector's peers
    pub fn spawn_entity(
        &mut self,
        sector_id: SectorId,
        mut record: EntityRecord,
    ) -> Result<EntityId, SectornetServerError> {
        if !self.sectors.contains_key(&sector_id) {
            return Err(SectornetServerError::UnknownSector(sector_id));
        }
        let entity_id = self.data.next_entity_id();
        record.set_entity_id(entity_id);
        self.insert_record(sector_id, record)?;
        self.events.push_spawn(entity_id);
        Ok(entity_id)
    }

    /// Removes an entity from its sector, telling the sector's peers.
    /// Returns the detached record.
    pub fn destroy_entity(&mut self, entity_id: EntityId) -> Option<EntityRecord> {
        let record = self.take_record(entity_id)?;
        self.events.push_destroy(entity_id);
        Some(record)
    }

    fn insert_record(
        &mut self,
        sector_id: SectorId,
        record: EntityRecord,
    ) -> Result<(), SectornetServerError> {
        let entity_id = record.entity_id();
        let Some(sector) = self.sectors.get_mut(&sector_id) else {
            return Err(SectornetServerError::UnknownSector(sector_id));
        };
        sector.insert_entity(record, &mut self.io, self.scene.as_mut());
        self.data.directory.insert(entity_id, sector_id);
        Ok(())
    }

    fn take_record(&mut self, entity_id: EntityId) -> Option<EntityRecord> {
        let sector_id = self.data.sector_of(entity_id)?;
        let sector = self.sectors.get_mut(&sector_id)?;
        let record = sector.remove_entity(entity_id, &mut self.io, self.scene.as_mut())?;
        self.data.directory.remove(&entity_id);
        Some(record)
    }

    /// Moves an entity and tells everyone in its sector
    pub fn move_entity(
        &mut self,
        entity_id: EntityId,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<(), EntityActionError> {
        let sector_id = self.loaded_sector_of(entity_id)?;
        let Some((sector, io, scene, events)) = self.sector_parts(sector_id) else {
            return Err(EntityActionError::UnknownEntity(entity_id));
        };
        sector.apply_transform(entity_id, position, rotation, scene);
        events.push_transform(entity_id);
        let update = TransformUpdate {
            entity_id,
            position,
            rotation,
        };
        sector.echo_to_sector(io, &update, DeliveryMethod::Unreliable, None);
        Ok(())
    }

    fn loaded_sector_of(&self, entity_id: EntityId) -> Result<SectorId, EntityActionError> {
        self.data
            .sector_of(entity_id)
            .filter(|sector_id| {
                self.sectors
                    .get(sector_id)
                    .map_or(false, |sector| sector.contains(entity_id))
            })
            .ok_or(EntityActionError::UnknownEntity(entity_id))
    }

    // Components

    /// Pushes a component's current state to the entity's sector, or only to
    /// its owners
    pub fn net_update_component(
        &mut self,
        entity_id: EntityId,
        index: ComponentIndex,
        owners_only: bool,
        delivery: DeliveryMethod,
    ) -> Result<usize, EntityActionError> {
        let sector_id = self.loaded_sector_of(entity_id)?;
        let Some(sector) = self.sectors.get(&sector_id) else {
            return Err(EntityActionError::UnknownEntity(entity_id));
        };
        Ok(sector.net_update_component(&mut self.io, entity_id, index, owners_only, delivery))
    }

    /// Sets an entity's health. Returns whether it is now depleted.
    pub fn set_health(&mut self, entity_id: EntityId, health: i32) -> Result<bool, EntityActionError> {
        let sector_id = self.loaded_sector_of(entity_id)?;
        let (index, depleted) = {
            let record = self.record_mut(sector_id, entity_id)?;
            let missing = EntityActionError::MissingComponent {
                entity_id,
                kind: ComponentKind::Health,
            };
            let (index, component) = record
                .components_mut()
                .find_mut(ComponentKind::Health)
                .ok_or(missing)?;
            let depleted = match component.as_health_mut() {
                Some(component) => component.set(health),
                None => false,
            };
            (index, depleted)
        };

        self.events
            .push_component_update(entity_id, index, ComponentKind::Health);
        if depleted {
            self.events.push_health_depleted(entity_id, health);
        }
        self.net_update_component(entity_id, index, false, DeliveryMethod::ReliableUnordered)?;
        Ok(depleted)
    }

    /// Flips an entity's toggle. Returns the new state.
    pub fn toggle(&mut self, entity_id: EntityId) -> Result<bool, EntityActionError> {
        let sector_id = self.loaded_sector_of(entity_id)?;
        let (index, state) = {
            let record = self.record_mut(sector_id, entity_id)?;
            let missing = EntityActionError::MissingComponent {
                entity_id,
                kind: ComponentKind::Toggle,
            };
            let (index, component) = record
                .components_mut()
                .find_mut(ComponentKind::Toggle)
                .ok_or(missing)?;
            let state = match component.as_toggle_mut() {
                Some(toggle) => toggle.toggle(),
                None => false,
            };
            (index, state)
        };

        self.events
            .push_component_update(entity_id, index, ComponentKind::Toggle);
        self.net_update_component(entity_id, index, false, DeliveryMethod::ReliableUnordered)?;
        Ok(state)
    }

    fn record_mut(
        &mut self,
        sector_id: SectorId,
        entity_id: EntityId,
    ) -> Result<&mut EntityRecord, EntityActionError> {
        self.sectors
            .get_mut(&sector_id)
            .and_then(|sector| sector.record_mut(entity_id))
            .ok_or(EntityActionError::UnknownEntity(entity_id))
    }

    // Items

    /// Moves the stacks of an item pickup into the collector's storage. The
    /// pickup is removed once empty; whatever does not fit stays in it.
    /// Returns the number of items moved.
    pub fn collect_pickup(
        &mut self,
        collector: EntityId,
        pickup: EntityId,
    ) -> Result<u32, EntityActionError> {
        let sector_id = self.loaded_sector_of(collector)?;
        if self.loaded_sector_of(pickup)? != sector_id {
            return Err(EntityActionError::DifferentSectors {
                first: collector,
                second: pickup,
            });
        }

        let (storage_index, mut storage) = {
            let record = self.record_mut(sector_id, collector)?;
            let missing = EntityActionError::MissingComponent {
                entity_id: collector,
                kind: ComponentKind::Storage,
            };
            let index = record.storage_index().ok_or(missing)?;
            let storage = record.storage(index).cloned().unwrap_or_default();
            (index, storage)
        };

        let items = match self.record_mut(sector_id, pickup)?.kind() {
            EntityKind::ItemPickup { items } => items.clone(),
            _ => return Err(EntityActionError::NotAPickup(pickup)),
        };

        let mut moved = 0;
        let mut remainder = Vec::new();
        for stack in items {
            match storage.store_item(&stack.item, stack.count) {
                Ok(_) => moved += stack.count,
                Err(error) => {
                    debug!("Pickup {} stack stays behind: {}", pickup, error);
                    remainder.push(stack);
                }
            }
        }
        if moved == 0 {
            return Ok(0);
        }

        if remainder.is_empty() {
            self.destroy_entity(pickup);
        } else if let Some((sector, io, _, _)) = self.sector_parts(sector_id) {
            if let Some(record) = sector.record_mut(pickup) {
                *record.kind_mut() = EntityKind::ItemPickup { items: remainder };
                let spawn = SpawnEntity {
                    record: record.clone(),
                };
                sector.echo_to_sector(io, &spawn, DeliveryMethod::ReliableUnordered, None);
            }
        }

        if let Some(target) = self.record_mut(sector_id, collector)?.storage_mut(storage_index) {
            *target = storage;
        }
        self.events.push_inventory_change(collector, storage_index);
        self.net_update_component(
            collector,
            storage_index,
            true,
            DeliveryMethod::ReliableOrdered,
        )?;
        Ok(moved)
    }

    /// Spawns an item pickup anyone may collect
    pub(crate) fn spawn_pickup(
        &mut self,
        sector_id: SectorId,
        position: Vec3,
        stack: ItemStack,
    ) -> Result<EntityId, SectornetServerError> {
        let record = EntityRecord::new(EntityKind::ItemPickup { items: vec![stack] })
            .with_transform(position, Vec3::ZERO)
            .with_owners(Owners::anyone());
        self.spawn_entity(sector_id, record)
    }

    // Players

    /// Checks a login and returns the peer id it maps to, creating the
    /// player on first login
    pub fn validate_player(&mut self, login: &LoginPacket) -> Result<PeerId, LoginRejection> {
        if login.username.is_empty() {
            return Err(LoginRejection::EmptyUsername);
        }
        let digest = password_digest(&login.username, &login.password);

        if let Some(player) = self.data.player_by_name(&login.username) {
            let peer_id = player.peer_id;
            if self.active.contains_key(&peer_id) {
                return Err(LoginRejection::AlreadyConnected(login.username.clone()));
            }
            if self.config.require_auth && player.password_digest != digest {
                return Err(LoginRejection::WrongPassword);
            }
            return Ok(peer_id);
        }

        let peer_id = self.data.next_player_id();
        let Some(home) = self.data.home_sector else {
            return Err(SectornetServerError::UnknownSector(0).into());
        };
        self.load_sector(home)?;
        let entity_id = self.spawn_entity(home, self.new_player_record(peer_id))?;

        self.data.usernames.insert(login.username.clone(), peer_id);
        self.data.players.insert(
            peer_id,
            PlayerData {
                peer_id,
                username: login.username.clone(),
                password_digest: digest,
                sector_id: home,
                entity_id,
            },
        );
        info!("Registered new player {} as peer {}", login.username, peer_id);
        Ok(peer_id)
    }

    fn new_player_record(&self, peer_id: PeerId) -> EntityRecord {
        let mut record = EntityRecord::new(EntityKind::player(fastrand::f32()))
            .with_transform(self.config.spawn_position, Vec3::ZERO)
            .with_owners(Owners::only(peer_id));
        if let Some(index) = record.storage_index() {
            if let Some(storage) = record.storage_mut(index) {
                *storage = StorageComponent::new(self.config.player_inventory_slots);
            }
        }
        record
    }

    /// Makes a validated player live in its sector and sends it the sector
    /// contents. A player whose entity went missing is given a new one.
    pub fn connect_player(&mut self, peer: PeerId) -> Result<(), SectornetServerError> {
        let Some(player) = self.data.player(peer) else {
            return Err(SectornetServerError::UnknownPeer(peer));
        };
        let (mut sector_id, mut entity_id) = (player.sector_id, player.entity_id);

        if self.load_sector(sector_id).is_err() {
            warn!("Sector {} of peer {} is unavailable, using home", sector_id, peer);
            sector_id = self
                .data
                .home_sector
                .ok_or(SectornetServerError::UnknownSector(sector_id))?;
            self.load_sector(sector_id)?;
        }

        let present = self
            .sectors
            .get(&sector_id)
            .map_or(false, |sector| sector.contains(entity_id));
        if !present {
            entity_id = self.spawn_entity(sector_id, self.new_player_record(peer))?;
            debug!("Respawned player entity {} for peer {}", entity_id, peer);
        }
        if let Some(player) = self.data.players.get_mut(&peer) {
            player.sector_id = sector_id;
            player.entity_id = entity_id;
        }

        let Some(sector) = self.sectors.get_mut(&sector_id) else {
            return Err(SectornetServerError::UnknownSector(sector_id));
        };
        sector.player_connect(peer, entity_id, &mut self.io);
        self.active.insert(peer, sector_id);
        info!("Peer {} joined sector {}", peer, sector_id);
        Ok(())
    }

    /// Validates a login and connects the player
    pub fn login(&mut self, login: &LoginPacket) -> Result<PeerId, LoginRejection> {
        let peer = self.validate_player(login)?;
        self.connect_player(peer)?;
        info!("{} logged in as peer {}", login.username, peer);
        Ok(peer)
    }

    /// Removes a live peer. Its player entity stays in the world.
    pub fn disconnect_player(&mut self, peer: PeerId) -> bool {
        let Some(sector_id) = self.active.remove(&peer) else {
            return false;
        };
        let entity_id = self.player_entity(peer).unwrap_or_default();
        if let Some(sector) = self.sectors.get_mut(&sector_id) {
            sector.player_disconnect(peer, entity_id, self.scene.as_ref());
        }
        info!("Peer {} left sector {}", peer, sector_id);
        true
    }

    // Portals

    /// Sends the peer's player through node `portal_id` of `holder` into
    /// whichever sector the linked holder is in
    pub(crate) fn transfer_through_portal(
        &mut self,
        peer: PeerId,
        holder: EntityId,
        portal_id: u8,
    ) -> Result<(), Rejection> {
        let invalid = Rejection::InvalidPortal {
            entity_id: holder,
            portal_id,
        };
        let source_sector = self.active_sector(peer).ok_or_else(|| invalid.clone())?;
        let node = self
            .sectors
            .get(&source_sector)
            .and_then(|sector| sector.record(holder))
            .and_then(|record| record.components().find(ComponentKind::Portal))
            .and_then(|(_, component)| component.as_portal())
            .and_then(|portal| portal.node(portal_id))
            .cloned()
            .ok_or_else(|| invalid.clone())?;

        let target_sector = self
            .data
            .sector_of(node.target_entity)
            .ok_or_else(|| invalid.clone())?;
        if let Err(error) = self.load_sector(target_sector) {
            warn!("Portal target sector {} failed to load: {}", target_sector, error);
            return Err(invalid);
        }

        let (exit_position, exit_rotation) = self
            .sectors
            .get(&target_sector)
            .and_then(|sector| sector.record(node.target_entity))
            .and_then(|target| {
                let exit = target
                    .components()
                    .find(ComponentKind::Portal)
                    .and_then(|(_, component)| component.as_portal())
                    .and_then(|portal| portal.node(node.target_node))?;
                Some((
                    target.position + exit.exit_position,
                    target.rotation + exit.exit_rotation,
                ))
            })
            .ok_or_else(|| invalid.clone())?;

        // nothing changes until the player is known to be movable
        let entity_id = self
            .player_entity(peer)
            .filter(|entity_id| self.data.sector_of(*entity_id) == Some(source_sector))
            .filter(|entity_id| {
                self.sectors
                    .get(&source_sector)
                    .map(|sector| sector.record(*entity_id).is_some())
                    .unwrap_or(false)
            })
            .ok_or_else(|| invalid.clone())?;

        if let Some(sector) = self.sectors.get_mut(&source_sector) {
            sector.player_disconnect(peer, entity_id, self.scene.as_ref());
        }
        let Some(mut record) = self.take_record(entity_id) else {
            self.rejoin(peer, entity_id, source_sector);
            return Err(invalid);
        };
        let origin = (record.position, record.rotation);
        record.set_transform(exit_position, exit_rotation);
        if let Err(error) = self.insert_record(target_sector, record.clone()) {
            warn!("Portal transfer of entity {} failed: {}", entity_id, error);
            record.set_transform(origin.0, origin.1);
            if let Err(error) = self.insert_record(source_sector, record) {
                warn!(
                    "Entity {} could not return to sector {}: {}",
                    entity_id, source_sector, error
                );
            }
            self.rejoin(peer, entity_id, source_sector);
            return Err(invalid);
        }
        self.active.remove(&peer);
        if let Some(player) = self.data.players.get_mut(&peer) {
            player.sector_id = target_sector;
        }

        if let Some(sector) = self.sectors.get_mut(&target_sector) {
            sector.player_connect(peer, entity_id, &mut self.io);
        }
        self.active.insert(peer, target_sector);
        info!(
            "Peer {} moved from sector {} to sector {}",
            peer, source_sector, target_sector
        );
        Ok(())
    }

    // puts a peer back into the sector it was leaving
    fn rejoin(&mut self, peer: PeerId, entity_id: EntityId, sector_id: SectorId) {
        if let Some(sector) = self.sectors.get_mut(&sector_id) {
            sector.player_connect(peer, entity_id, &mut self.io);
        }
    }
}

fn world_path(config: &ServerConfig) -> Option<PathBuf> {
    config
        .save_directory
        .as_deref()
        .map(|directory: &Path| directory.join(WORLD_FILE))
}
