use std::{
    collections::VecDeque,
    mem,
    sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;

use crate::{messages::delivery::DeliveryMethod, types::PeerId};

/// Errors surfaced by a transport implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Peer {0} is not connected")]
    UnknownPeer(PeerId),

    #[error("Transport is closed")]
    Closed,

    #[error("Transport failure: {0}")]
    Other(String),
}

/// Server side of the socket: sends a packet to one peer
pub trait PacketSender: Send {
    fn send(
        &mut self,
        peer: PeerId,
        bytes: &[u8],
        delivery: DeliveryMethod,
    ) -> Result<(), TransportError>;
}

/// Client side of the socket: sends a packet to the server
pub trait ServerLink: Send {
    fn send(&mut self, bytes: &[u8], delivery: DeliveryMethod) -> Result<(), TransportError>;
}

/// FIFO of received packets, shared between the socket thread that fills it
/// and the tick that drains it
#[derive(Clone, Default)]
pub struct IncomingQueue {
    inner: Arc<Mutex<VecDeque<(PeerId, Box<[u8]>)>>>,
}

impl IncomingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, peer: PeerId, bytes: Box<[u8]>) {
        self.lock().push_back((peer, bytes));
    }

    /// Swaps out everything queued so far. Packets pushed afterwards wait for the next call.
    pub fn take_all(&self) -> VecDeque<(PeerId, Box<[u8]>)> {
        mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<(PeerId, Box<[u8]>)>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
