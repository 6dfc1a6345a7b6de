use log::{debug, info, warn};

use sectornet_shared::{
    dispatch, peek_kind, DispatchError, DropReason, EntityId, EntityRecord, IncomingQueue,
    LoginPacket, LoginResponse, MessageOutcome, PeerId, Protocol, SceneSpawner, SectorId,
    SectorParameters, Vec3, WorldEvents,
};

use crate::{
    error::{EntityActionError, SectornetServerError},
    handlers::ServerHandler,
    io::Io,
    login::LoginRejection,
    transport::{ConnectionIo, ConnectionToken, ServerTransport},
    world::ServerWorld,
    ServerConfig,
};

/// A server that accepts logins, applies client messages to its sectors
/// and echoes accepted changes back out
pub struct Server {
    world: ServerWorld,
    incoming: IncomingQueue,
    connections: Box<dyn ConnectionIo>,
}

impl Server {
    /// Starts listening on `transport` and loads the world
    pub fn start(
        server_config: ServerConfig,
        mut protocol: Protocol,
        transport: &mut dyn ServerTransport,
        scene: Box<dyn SceneSpawner>,
    ) -> Result<Self, SectornetServerError> {
        if !protocol.is_locked() {
            protocol.lock();
        }

        let incoming = IncomingQueue::new();
        let sockets = transport
            .listen(incoming.clone())
            .map_err(SectornetServerError::Listen)?;
        let io = Io::new(sockets.packet_sender, protocol.max_payload_bytes);
        let world = ServerWorld::new(server_config, protocol, io, scene)?;
        info!("Server listening");

        Ok(Self {
            world,
            incoming,
            connections: sockets.connections,
        })
    }

    /// Handle for pushing received packets, for transports that feed the
    /// queue directly
    pub fn incoming(&self) -> IncomingQueue {
        self.incoming.clone()
    }

    /// Must be called regularly. Handles disconnects, then logins, then
    /// every packet queued before this call. Returns the outcome of each packet.
    pub fn tick(&mut self) -> Vec<(PeerId, MessageOutcome)> {
        while let Some(peer) = self.connections.next_disconnect() {
            self.disconnect_peer(peer);
        }
        while let Some((token, login)) = self.connections.next_login() {
            self.accept_login(token, login);
        }

        let packets = self.incoming.take_all();
        let mut outcomes = Vec::with_capacity(packets.len());
        for (peer, bytes) in packets {
            let outcome = self.receive_packet(peer, &bytes);
            outcomes.push((peer, outcome));
        }
        outcomes
    }

    fn accept_login(&mut self, token: ConnectionToken, login: LoginPacket) {
        let response = match self.world.validate_player(&login) {
            Ok(peer_id) => LoginResponse::Accepted { peer_id },
            Err(rejection) => {
                info!("Refused login for {}: {}", login.username, rejection);
                rejection.to_response()
            }
        };
        let accepted = match &response {
            LoginResponse::Accepted { peer_id } => Some(*peer_id),
            LoginResponse::Rejected { .. } => None,
        };
        if let Err(error) = self.connections.respond(token, response) {
            warn!("Failed to answer login for {}: {}", login.username, error);
            return;
        }
        if let Some(peer) = accepted {
            match self.world.connect_player(peer) {
                Ok(()) => info!("{} logged in as peer {}", login.username, peer),
                Err(error) => warn!("Peer {} could not be placed in the world: {}", peer, error),
            }
        }
    }

    /// Applies one packet from `peer`
    pub fn receive_packet(&mut self, peer: PeerId, bytes: &[u8]) -> MessageOutcome {
        if !self.world.is_active(peer) {
            debug!("Dropping packet from disconnected peer {}", peer);
            return DropReason::UnknownPeer(peer).into();
        }
        let max = self.world.protocol().max_payload_bytes;
        if bytes.len() > max {
            let error = DispatchError::Oversized {
                len: bytes.len(),
                max,
            };
            warn!("Dropping packet from peer {}: {}", peer, error);
            return DropReason::Dispatch(error).into();
        }

        let outcome = dispatch(bytes, &mut ServerHandler::new(peer, &mut self.world));
        match &outcome {
            MessageOutcome::Applied | MessageOutcome::Dropped(DropReason::Dispatch(_)) => {}
            MessageOutcome::Rejected(rejection) => {
                debug!("Rejected {:?} from peer {}: {}", peek_kind(bytes).ok(), peer, rejection)
            }
            MessageOutcome::Dropped(reason) => {
                debug!("Dropped {:?} from peer {}: {}", peek_kind(bytes).ok(), peer, reason)
            }
        }
        outcome
    }

    // Connections

    /// Logs a player in directly, bypassing the transport's login channel
    pub fn connect_peer(&mut self, login: &LoginPacket) -> Result<PeerId, LoginRejection> {
        self.world.login(login)
    }

    pub fn disconnect_peer(&mut self, peer: PeerId) -> bool {
        self.world.disconnect_player(peer)
    }

    // World

    pub fn world(&self) -> &ServerWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ServerWorld {
        &mut self.world
    }

    /// Events raised since the last call
    pub fn take_events(&mut self) -> WorldEvents {
        self.world.take_events()
    }

    pub fn add_sector(&mut self, name: &str, parameters: SectorParameters) -> SectorId {
        self.world.add_new_sector(name, parameters)
    }

    pub fn spawn_entity(
        &mut self,
        sector_id: SectorId,
        record: EntityRecord,
    ) -> Result<EntityId, SectornetServerError> {
        self.world.spawn_entity(sector_id, record)
    }

    pub fn destroy_entity(&mut self, entity_id: EntityId) -> Option<EntityRecord> {
        self.world.destroy_entity(entity_id)
    }

    pub fn move_entity(
        &mut self,
        entity_id: EntityId,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<(), EntityActionError> {
        self.world.move_entity(entity_id, position, rotation)
    }

    pub fn set_health(&mut self, entity_id: EntityId, health: i32) -> Result<bool, EntityActionError> {
        self.world.set_health(entity_id, health)
    }

    pub fn toggle(&mut self, entity_id: EntityId) -> Result<bool, EntityActionError> {
        self.world.toggle(entity_id)
    }

    pub fn collect_pickup(
        &mut self,
        collector: EntityId,
        pickup: EntityId,
    ) -> Result<u32, EntityActionError> {
        self.world.collect_pickup(collector, pickup)
    }

    pub fn save_world(&mut self) -> Result<(), SectornetServerError> {
        self.world.save_world()
    }
}
