use std::{collections::HashMap, time::Duration};

use crate::messages::{delivery::DeliveryMethod, message_kind::MessageKind};

pub mod error;
pub use error::ProtocolError;

// Protocol
pub struct Protocol {
    /// The duration between each tick
    pub tick_interval: Duration,
    /// Largest encoded message, tag included, that will be sent or accepted
    pub max_payload_bytes: usize,
    delivery: HashMap<MessageKind, DeliveryMethod>,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        let delivery = MessageKind::ALL
            .iter()
            .map(|kind| (*kind, kind.default_delivery()))
            .collect();

        Self {
            tick_interval: Duration::from_millis(50),
            max_payload_bytes: 64 * 1024,
            delivery,
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn tick_interval(&mut self, duration: Duration) -> &mut Self {
        self.check_lock();
        self.tick_interval = duration;
        self
    }

    pub fn max_payload_bytes(&mut self, bytes: usize) -> &mut Self {
        self.check_lock();
        self.max_payload_bytes = bytes;
        self
    }

    pub fn delivery(&mut self, kind: MessageKind, method: DeliveryMethod) -> &mut Self {
        self.check_lock();
        self.delivery.insert(kind, method);
        self
    }

    // Non-panicking builder methods

    pub fn try_tick_interval(&mut self, duration: Duration) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.tick_interval = duration;
        Ok(self)
    }

    pub fn try_max_payload_bytes(&mut self, bytes: usize) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        if bytes < 2 {
            return Err(ProtocolError::PayloadTooSmall { bytes, minimum: 2 });
        }
        self.max_payload_bytes = bytes;
        Ok(self)
    }

    pub fn try_delivery(
        &mut self,
        kind: MessageKind,
        method: DeliveryMethod,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.delivery.insert(kind, method);
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    /// Delivery configured for `kind`
    pub fn delivery_for(&self, kind: MessageKind) -> DeliveryMethod {
        self.delivery
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_delivery())
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
