use sectornet_shared::{
    IncomingQueue, LoginPacket, LoginResponse, PacketSender, PeerId, TransportError,
};

/// Identifies a connection that has not logged in yet
pub type ConnectionToken = u64;

/// A socket the server can listen on. Received packets are pushed into the
/// queue from whatever thread the socket runs on.
pub trait ServerTransport {
    fn listen(&mut self, incoming: IncomingQueue) -> Result<ListenSockets, TransportError>;
}

/// Connection lifecycle: logins waiting for an answer, and dropped peers
pub trait ConnectionIo: Send {
    fn next_login(&mut self) -> Option<(ConnectionToken, LoginPacket)>;

    /// Answers a login. An accepted connection is addressed by its peer id from then on.
    fn respond(
        &mut self,
        token: ConnectionToken,
        response: LoginResponse,
    ) -> Result<(), TransportError>;

    fn next_disconnect(&mut self) -> Option<PeerId>;
}

/// What a transport hands back once it is listening
pub struct ListenSockets {
    pub packet_sender: Box<dyn PacketSender>,
    pub connections: Box<dyn ConnectionIo>,
}
