use std::collections::BTreeMap;

use sectornet_shared::{
    ByteReader, ByteWrite, EntityId, PeerId, SectorId, SectorParameters, Serde, SerdeErr, ANYONE,
};

/// Everything the server remembers about one player between sessions
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerData {
    pub peer_id: PeerId,
    pub username: String,
    pub password_digest: Vec<u8>,
    pub sector_id: SectorId,
    pub entity_id: EntityId,
}

impl Serde for PlayerData {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.peer_id.ser(writer);
        self.username.ser(writer);
        self.password_digest.ser(writer);
        self.sector_id.ser(writer);
        self.entity_id.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            peer_id: PeerId::de(reader)?,
            username: String::de(reader)?,
            password_digest: Vec::de(reader)?,
            sector_id: SectorId::de(reader)?,
            entity_id: EntityId::de(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectorMetadata {
    pub name: String,
    pub parameters: SectorParameters,
}

impl Serde for SectorMetadata {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.name.ser(writer);
        self.parameters.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            parameters: SectorParameters::de(reader)?,
        })
    }
}

/// World-wide bookkeeping, persisted as `world.dat`
#[derive(Clone, Debug, PartialEq)]
pub struct WorldData {
    pub(crate) player_id_counter: PeerId,
    pub(crate) entity_id_counter: EntityId,
    pub(crate) sector_id_counter: SectorId,
    pub(crate) home_sector: Option<SectorId>,
    pub(crate) usernames: BTreeMap<String, PeerId>,
    pub(crate) players: BTreeMap<PeerId, PlayerData>,
    pub(crate) sectors: BTreeMap<SectorId, SectorMetadata>,
    /// Which sector each entity lives in, loaded or not
    pub(crate) directory: BTreeMap<EntityId, SectorId>,
}

impl Default for WorldData {
    fn default() -> Self {
        Self {
            // the anyone sentinel is never handed out
            player_id_counter: ANYONE + 1,
            entity_id_counter: 1,
            sector_id_counter: 0,
            home_sector: None,
            usernames: BTreeMap::new(),
            players: BTreeMap::new(),
            sectors: BTreeMap::new(),
            directory: BTreeMap::new(),
        }
    }
}

impl WorldData {
    pub(crate) fn next_player_id(&mut self) -> PeerId {
        let id = self.player_id_counter;
        self.player_id_counter += 1;
        id
    }

    pub(crate) fn next_entity_id(&mut self) -> EntityId {
        let id = self.entity_id_counter;
        self.entity_id_counter += 1;
        id
    }

    pub(crate) fn next_sector_id(&mut self) -> SectorId {
        let id = self.sector_id_counter;
        self.sector_id_counter += 1;
        id
    }

    pub fn player(&self, peer_id: PeerId) -> Option<&PlayerData> {
        self.players.get(&peer_id)
    }

    pub fn player_by_name(&self, username: &str) -> Option<&PlayerData> {
        self.usernames
            .get(username)
            .and_then(|peer_id| self.players.get(peer_id))
    }

    pub fn sector_of(&self, entity_id: EntityId) -> Option<SectorId> {
        self.directory.get(&entity_id).copied()
    }

    pub fn sector_metadata(&self, sector_id: SectorId) -> Option<&SectorMetadata> {
        self.sectors.get(&sector_id)
    }

    pub fn home_sector(&self) -> Option<SectorId> {
        self.home_sector
    }
}

impl Serde for WorldData {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.player_id_counter.ser(writer);
        self.entity_id_counter.ser(writer);
        self.sector_id_counter.ser(writer);
        self.home_sector.ser(writer);
        self.usernames.ser(writer);
        self.players.ser(writer);
        self.sectors.ser(writer);
        self.directory.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let data = Self {
            player_id_counter: PeerId::de(reader)?,
            entity_id_counter: EntityId::de(reader)?,
            sector_id_counter: SectorId::de(reader)?,
            home_sector: Option::de(reader)?,
            usernames: BTreeMap::de(reader)?,
            players: BTreeMap::de(reader)?,
            sectors: BTreeMap::de(reader)?,
            directory: BTreeMap::de(reader)?,
        };
        if data.player_id_counter == ANYONE {
            return Err(SerdeErr::InvalidValue {
                type_name: "WorldData",
                reason: "player id counter must start above the anyone sentinel",
            });
        }
        Ok(data)
    }
}
