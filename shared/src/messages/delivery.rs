/// Delivery guarantee requested from the transport for one send
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    /// May be lost or arrive out of order. Used for transforms.
    Unreliable,
    /// Always arrives, in any order. Used for spawn, destroy and discrete overwrites.
    ReliableUnordered,
    /// Always arrives, in send order. Used for inventory.
    ReliableOrdered,
}

impl DeliveryMethod {
    pub fn is_reliable(&self) -> bool {
        !matches!(self, DeliveryMethod::Unreliable)
    }
}
