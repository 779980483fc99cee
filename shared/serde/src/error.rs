use thiserror::Error;

/// Errors that can occur while reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the value was complete (truncated payload)
    #[error("Attempted to read past the end of a {buffer_bytes} byte buffer")]
    ReadPastEnd { buffer_bytes: usize },

    /// A complete value was read but unread bytes or set padding bits follow it
    #[error("Unread data after a complete message in a {buffer_bytes} byte buffer")]
    TrailingData { buffer_bytes: usize },

    /// A variable-length integer carried more bits than its target type holds
    #[error("Variable-length integer exceeds {max_bits} bits")]
    IntegerOverflow { max_bits: u32 },

    /// An integer does not fit in the declared number of bits
    #[error("Value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u64, bits: u8 },

    /// The stream decoded cleanly but the value violates a structural rule
    #[error("Invalid {what}: {reason}")]
    InvalidValue {
        what: &'static str,
        reason: String,
    },
}
