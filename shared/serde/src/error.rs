use thiserror::Error;

/// Errors that can occur while decoding bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of bytes before the value was complete
    #[error("Unexpected end of buffer: needed {needed} more bytes but only {remaining} remain. Payload is truncated or malformed")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length prefix claims more elements than could possibly fit in the buffer
    #[error("Length prefix {length} exceeds the {remaining} bytes remaining in the buffer")]
    LengthExceedsRemaining { length: usize, remaining: usize },

    /// A tag byte did not match any known variant
    #[error("Invalid {type_name} tag {tag}")]
    InvalidTag { type_name: &'static str, tag: u16 },

    /// A bool was encoded as something other than 0 or 1
    #[error("Invalid bool byte {0}, expected 0 or 1")]
    InvalidBool(u8),

    /// A string payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// Bytes were left over after decoding a value that should span the whole buffer
    #[error("{trailing} trailing bytes after decoding")]
    TrailingBytes { trailing: usize },

    /// Values were nested deeper than the reader allows
    #[error("Values nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// A decoded value violated a constraint of its type
    #[error("Invalid value for {type_name}: {reason}")]
    InvalidValue {
        type_name: &'static str,
        reason: &'static str,
    },
}
