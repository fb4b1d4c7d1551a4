//! # Manufacturer-Data Container - Advertisement Payload Assembly
//!
//! ## Purpose
//!
//! Ordered mapping from 16-bit TLV keys to raw value bytes representing one
//! advertisement's manufacturer-data payload. Handles both directions of the
//! wire boundary: building a payload from field assignments with exact size
//! accounting, and parsing a received advertisement buffer back into entries
//! with cheap foreign-traffic filtering before the full walk.
//!
//! ## Wire Format
//!
//! ```text
//! byte 0:      structure length (= 1 + bytes that follow)
//! byte 1:      advertisement data type = 0xFF (manufacturer-specific)
//! bytes 2-3:   company identifier, little-endian
//! then per entry:
//!   byte 0:    entry length L (= 2 + value byte count)
//!   bytes 1-2: field key, u16 little-endian
//!   bytes 3..: value bytes (L - 2 of them)
//! ```

use tracing::trace;

use crate::codec::decode_entry;
use crate::constants::{
    COMPANY_ID, CONTAINER_HEADER_LEN, ENTRY_HEADER_LEN, MANUFACTURER_DATA_TYPE, MATCH_PREFIX,
};
use crate::error::{ProtocolError, ProtocolResult};

/// One keyed TLV entry: a field key and its packed value bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerDataEntry {
    pub key: u16,
    pub value: Vec<u8>,
}

impl ManufacturerDataEntry {
    /// Serialized size of this entry including its framing
    pub fn encoded_len(&self) -> usize {
        ENTRY_HEADER_LEN + self.value.len()
    }
}

/// Insertion-ordered advertisement payload container
///
/// Replacing an existing key updates the entry in place, so re-serialization
/// of an updated container is byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManufacturerData {
    entries: Vec<ManufacturerDataEntry>,
}

impl ManufacturerData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, preserving insertion order on replace
    pub fn set(&mut self, key: u16, value: Vec<u8>) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.value = value;
        } else {
            self.entries.push(ManufacturerDataEntry { key, value });
        }
    }

    pub fn get(&self, key: u16) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_slice())
    }

    pub fn contains(&self, key: u16) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Remove an entry, returning its value bytes if present
    pub fn remove(&mut self, key: u16) -> Option<Vec<u8>> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(index).value)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ManufacturerDataEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current serialized size without materializing the buffer. Used by the
    /// splitter for budgeting before commit.
    pub fn byte_length(&self) -> usize {
        CONTAINER_HEADER_LEN + self.entries.iter().map(|e| e.encoded_len()).sum::<usize>()
    }

    /// Serialize to a complete advertisement structure.
    ///
    /// `max_len` is the caller-supplied advertisement ceiling (31 legacy, 252
    /// extended); exceeding it fails with `PayloadTooLarge`.
    pub fn serialize(&self, max_len: usize) -> ProtocolResult<Vec<u8>> {
        let total = self.byte_length();
        if total > max_len {
            return Err(ProtocolError::PayloadTooLarge {
                size: total,
                max: max_len,
            });
        }

        let mut buffer = Vec::with_capacity(total);
        // Structure length counts everything after itself
        buffer.push((total - 1) as u8);
        buffer.push(MANUFACTURER_DATA_TYPE);
        buffer.extend_from_slice(&COMPANY_ID.to_le_bytes());
        for entry in &self.entries {
            buffer.push((2 + entry.value.len()) as u8);
            buffer.extend_from_slice(&entry.key.to_le_bytes());
            buffer.extend_from_slice(&entry.value);
        }
        Ok(buffer)
    }

    /// Parse a received advertisement structure.
    ///
    /// Validates the data type tag and company identifier first so mixed scan
    /// traffic can be filtered cheaply (`NotABroadcastNetPacket`), then walks
    /// entries up to the declared structure length. Trailing bytes beyond the
    /// declared length are ignored; scan buffers are often padded. A partial
    /// trailing entry fails with `TruncatedFrame`.
    pub fn parse(buffer: &[u8]) -> ProtocolResult<Self> {
        if buffer.len() < CONTAINER_HEADER_LEN {
            return Err(ProtocolError::NotABroadcastNetPacket);
        }
        if buffer[1] != MANUFACTURER_DATA_TYPE
            || u16::from_le_bytes([buffer[2], buffer[3]]) != COMPANY_ID
        {
            trace!(adt = buffer[1], "filtered foreign advertisement");
            return Err(ProtocolError::NotABroadcastNetPacket);
        }

        let declared_end = 1 + buffer[0] as usize;
        if declared_end < CONTAINER_HEADER_LEN {
            return Err(ProtocolError::NotABroadcastNetPacket);
        }
        if buffer.len() < declared_end {
            return Err(ProtocolError::TruncatedFrame {
                offset: 0,
                need: declared_end,
                available: buffer.len(),
            });
        }

        let frame = &buffer[..declared_end];
        let mut container = Self::new();
        let mut offset = CONTAINER_HEADER_LEN;
        while offset < frame.len() {
            let (entry, next_offset) = decode_entry(frame, offset)?;
            container.set(entry.key, entry.value);
            offset = next_offset;
        }
        Ok(container)
    }

    /// Cheap pre-filter: does this buffer start like a BroadcastNet
    /// advertisement carrying the sequence number entry first?
    pub fn matches_prefix(buffer: &[u8]) -> bool {
        buffer.len() > MATCH_PREFIX.len() && buffer[1..=MATCH_PREFIX.len()] == MATCH_PREFIX
    }
}
