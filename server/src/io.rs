use log::warn;

use sectornet_shared::{write_message, DeliveryMethod, Message, PacketSender, PeerId, WriterPool};

/// Outbound half of the server's socket, with pooled encode buffers
pub struct Io {
    sender: Box<dyn PacketSender>,
    pool: WriterPool,
    max_payload_bytes: usize,
}

impl Io {
    pub fn new(sender: Box<dyn PacketSender>, max_payload_bytes: usize) -> Self {
        Self {
            sender,
            pool: WriterPool::default(),
            max_payload_bytes,
        }
    }

    pub fn send_message<M: Message>(
        &mut self,
        peer: PeerId,
        message: &M,
        delivery: DeliveryMethod,
    ) -> bool {
        self.broadcast(std::iter::once(peer), message, delivery) == 1
    }

    /// Encodes `message` once and sends the same bytes to every peer in
    /// `peers`. Returns how many sends succeeded.
    pub fn broadcast<M: Message, I: IntoIterator<Item = PeerId>>(
        &mut self,
        peers: I,
        message: &M,
        delivery: DeliveryMethod,
    ) -> usize {
        let mut writer = self.pool.checkout();
        write_message(message, &mut writer);

        let mut sent = 0;
        if writer.len() > self.max_payload_bytes {
            warn!(
                "Not sending {:?}: {} bytes exceeds the {} byte limit",
                M::KIND,
                writer.len(),
                self.max_payload_bytes
            );
        } else {
            for peer in peers {
                match self.sender.send(peer, writer.as_slice(), delivery) {
                    Ok(()) => sent += 1,
                    Err(error) => warn!("Failed to send {:?} to peer {}: {}", M::KIND, peer, error),
                }
            }
        }

        self.pool.recycle(writer);
        sent
    }
}
