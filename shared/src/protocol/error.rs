use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// Payload limit is too small to hold any message
    #[error("Max payload of {bytes} bytes is too small. At least {minimum} bytes are needed for the message tag")]
    PayloadTooSmall { bytes: usize, minimum: usize },
}
