//! Protocol-level errors for BroadcastNet payload processing
//!
//! Each error variant carries the specific context a caller needs to decide
//! whether to drop one packet, skip one field, or escalate. Two variants are
//! expected outcomes rather than faults: [`ProtocolError::NotABroadcastNetPacket`]
//! is the normal result of scanning mixed advertisement traffic, and
//! [`ProtocolError::DuplicatePacket`] is the normal result of re-received
//! broadcasts. Neither should abort a scan loop.

use thiserror::Error;

/// Codec, container, and tracker errors with detailed context
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Unknown field: {0:?}")]
    UnknownField(String),

    #[error("Value shape mismatch for key {key:#06x}: expected {expected} component(s), got {got}")]
    ValueArityMismatch { key: u16, expected: usize, got: usize },

    #[error("Value out of range for key {key:#06x}: max {max}, got {got}")]
    ValueRangeError { key: u16, max: u32, got: u32 },

    #[error("Truncated field value for key {key:#06x}: expected {expected} bytes, got {got}")]
    TruncatedField { key: u16, expected: usize, got: usize },

    #[error("Truncated frame at offset {offset}: need {need} bytes, {available} available")]
    TruncatedFrame { offset: usize, need: usize, available: usize },

    #[error("Not a BroadcastNet packet")]
    NotABroadcastNetPacket,

    #[error("Payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Field {key:#06x} too large to fit any packet: entry is {size} bytes, budget {max}")]
    FieldTooLarge { key: u16, size: usize, max: usize },

    #[error("Missing sequence number entry")]
    MissingSequenceNumber,

    #[error("Duplicate packet: sequence number {sequence} already consumed")]
    DuplicatePacket { sequence: u8 },
}

/// Result type for protocol operations
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
