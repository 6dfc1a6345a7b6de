use log::{debug, info};

use sectornet_shared::{
    dispatch, peek_kind, DropReason, IncomingQueue, LoginPacket, LoginResponse, MessageOutcome,
    PeerId, Protocol, SceneSpawner,
};

use crate::{
    handlers::ClientHandler, transport::Connector, ClientConfig, ClientReplica,
    SectornetClientError,
};

/// A connected client: the replica plus the queue the link fills
pub struct Client {
    config: ClientConfig,
    replica: ClientReplica,
    incoming: IncomingQueue,
}

impl Client {
    /// Logs in through `connector`. Fails if the server refuses the login or
    /// does not answer within the configured timeout.
    pub async fn connect<C: Connector>(
        config: ClientConfig,
        mut protocol: Protocol,
        connector: &mut C,
        password: &str,
        scene: Box<dyn SceneSpawner>,
    ) -> Result<Self, SectornetClientError> {
        if !protocol.is_locked() {
            protocol.lock();
        }

        let incoming = IncomingQueue::new();
        let login = LoginPacket::new(&config.username, password);
        let handshake = connector.handshake(login, incoming.clone());
        let (response, link) = tokio::time::timeout(config.connect_timeout, handshake)
            .await
            .map_err(|_| SectornetClientError::ConnectTimeout(config.connect_timeout))??;

        let peer_id = match response {
            LoginResponse::Accepted { peer_id } => peer_id,
            LoginResponse::Rejected { reason } => {
                return Err(SectornetClientError::Rejected { reason });
            }
        };
        info!("Logged in as {} (peer {})", config.username, peer_id);

        Ok(Self {
            config,
            replica: ClientReplica::new(peer_id, protocol, Box::new(link), scene),
            incoming,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn peer_id(&self) -> PeerId {
        self.replica.peer_id()
    }

    pub fn replica(&self) -> &ClientReplica {
        &self.replica
    }

    pub fn replica_mut(&mut self) -> &mut ClientReplica {
        &mut self.replica
    }

    /// Applies every packet the server sent before this call
    pub fn tick(&mut self) -> Vec<MessageOutcome> {
        let packets = self.incoming.take_all();
        let mut outcomes = Vec::with_capacity(packets.len());
        for (_, bytes) in packets {
            let outcome = dispatch(&bytes, &mut ClientHandler {
                replica: &mut self.replica,
            });
            match &outcome {
                MessageOutcome::Applied | MessageOutcome::Dropped(DropReason::Dispatch(_)) => {}
                other => debug!("{:?} from server not applied: {:?}", peek_kind(&bytes).ok(), other),
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}
