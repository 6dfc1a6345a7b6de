//! In-memory transport for end-to-end testing. Routes packets between one
//! server and any number of clients without network I/O.

use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
};

use log::debug;
use tokio::sync::oneshot;

use sectornet_client::Connector;
use sectornet_server::{ConnectionIo, ConnectionToken, ListenSockets, ServerTransport};
use sectornet_shared::{
    peek_kind, DeliveryMethod, IncomingQueue, LoginPacket, LoginResponse, MessageKind,
    PacketSender, PeerId, ServerLink, TransportError,
};

/// One packet the server sent, as seen on the wire
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentPacket {
    pub peer: PeerId,
    pub kind: Option<MessageKind>,
    pub delivery: DeliveryMethod,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct HubState {
    server_incoming: Option<IncomingQueue>,
    clients: HashMap<PeerId, IncomingQueue>,
    pending_logins: VecDeque<(ConnectionToken, LoginPacket)>,
    handshakes: HashMap<ConnectionToken, (IncomingQueue, oneshot::Sender<LoginResponse>)>,
    disconnects: VecDeque<PeerId>,
    next_token: ConnectionToken,
    sent: Vec<SentPacket>,
}

/// Shared medium the server transport and every client connector attach to
#[derive(Clone, Default)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn connector(&self) -> LocalConnector {
        LocalConnector { hub: self.clone() }
    }

    /// Logins sent but not yet answered
    pub fn handshakes_in_flight(&self) -> usize {
        self.lock().handshakes.len()
    }

    /// Cuts a client off. The server hears about it on its next tick.
    pub fn disconnect(&self, peer: PeerId) {
        let mut state = self.lock();
        state.clients.remove(&peer);
        state.disconnects.push_back(peer);
        debug!("Hub cut off peer {}", peer);
    }

    /// Pushes raw bytes to the server as if `peer` had sent them
    pub fn inject(&self, peer: PeerId, bytes: &[u8]) {
        if let Some(incoming) = &self.lock().server_incoming {
            incoming.push(peer, bytes.into());
        }
    }

    /// Everything the server has sent so far, oldest first
    pub fn sent(&self) -> Vec<SentPacket> {
        self.lock().sent.clone()
    }

    pub fn clear_sent(&self) {
        self.lock().sent.clear();
    }

    pub fn sent_to(&self, peer: PeerId) -> Vec<SentPacket> {
        self.lock()
            .sent
            .iter()
            .filter(|packet| packet.peer == peer)
            .cloned()
            .collect()
    }
}

// Server side

impl ServerTransport for LocalHub {
    fn listen(&mut self, incoming: IncomingQueue) -> Result<ListenSockets, TransportError> {
        let mut state = self.lock();
        if state.server_incoming.is_some() {
            return Err(TransportError::Other("hub already has a server".to_string()));
        }
        state.server_incoming = Some(incoming);
        drop(state);

        Ok(ListenSockets {
            packet_sender: Box::new(LocalServerSender { hub: self.clone() }),
            connections: Box::new(LocalConnections { hub: self.clone() }),
        })
    }
}

struct LocalServerSender {
    hub: LocalHub,
}

impl PacketSender for LocalServerSender {
    fn send(
        &mut self,
        peer: PeerId,
        bytes: &[u8],
        delivery: DeliveryMethod,
    ) -> Result<(), TransportError> {
        let mut state = self.hub.lock();
        let Some(queue) = state.clients.get(&peer) else {
            return Err(TransportError::UnknownPeer(peer));
        };
        queue.push(0, bytes.into());
        state.sent.push(SentPacket {
            peer,
            kind: peek_kind(bytes).ok(),
            delivery,
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

struct LocalConnections {
    hub: LocalHub,
}

impl ConnectionIo for LocalConnections {
    fn next_login(&mut self) -> Option<(ConnectionToken, LoginPacket)> {
        self.hub.lock().pending_logins.pop_front()
    }

    fn respond(
        &mut self,
        token: ConnectionToken,
        response: LoginResponse,
    ) -> Result<(), TransportError> {
        let mut state = self.hub.lock();
        let Some((queue, answer)) = state.handshakes.remove(&token) else {
            return Err(TransportError::Closed);
        };
        if let LoginResponse::Accepted { peer_id } = &response {
            state.clients.insert(*peer_id, queue);
        }
        debug!("Hub answered handshake {}: {:?}", token, response);
        answer.send(response).map_err(|_| TransportError::Closed)
    }

    fn next_disconnect(&mut self) -> Option<PeerId> {
        self.hub.lock().disconnects.pop_front()
    }
}

// Client side

pub struct LocalConnector {
    hub: LocalHub,
}

impl Connector for LocalConnector {
    type Link = LocalClientLink;

    fn handshake(
        &mut self,
        login: LoginPacket,
        incoming: IncomingQueue,
    ) -> impl Future<Output = Result<(LoginResponse, LocalClientLink), TransportError>> + Send {
        let (sender, receiver) = oneshot::channel();
        {
            let mut state = self.hub.lock();
            let token = state.next_token;
            state.next_token += 1;
            state.pending_logins.push_back((token, login));
            state.handshakes.insert(token, (incoming, sender));
        }
        let hub = self.hub.clone();

        async move {
            let response = receiver.await.map_err(|_| TransportError::Closed)?;
            let peer = match &response {
                LoginResponse::Accepted { peer_id } => *peer_id,
                LoginResponse::Rejected { .. } => 0,
            };
            Ok((response, LocalClientLink { hub, peer }))
        }
    }
}

/// A client's connection to the server through the hub
pub struct LocalClientLink {
    hub: LocalHub,
    peer: PeerId,
}

impl ServerLink for LocalClientLink {
    fn send(&mut self, bytes: &[u8], _: DeliveryMethod) -> Result<(), TransportError> {
        let state = self.hub.lock();
        if !state.clients.contains_key(&self.peer) {
            return Err(TransportError::Closed);
        }
        match &state.server_incoming {
            Some(incoming) => {
                incoming.push(self.peer, bytes.into());
                Ok(())
            }
            None => Err(TransportError::Closed),
        }
    }
}
