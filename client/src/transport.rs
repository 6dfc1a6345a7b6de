use std::future::Future;

use sectornet_shared::{IncomingQueue, LoginPacket, LoginResponse, ServerLink, TransportError};

/// Opens a connection to a server and performs the login handshake. Packets
/// the server sends afterwards are pushed into `incoming`.
pub trait Connector {
    type Link: ServerLink + 'static;

    fn handshake(
        &mut self,
        login: LoginPacket,
        incoming: IncomingQueue,
    ) -> impl Future<Output = Result<(LoginResponse, Self::Link), TransportError>> + Send;
}
