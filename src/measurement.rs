//! # Measurement Entity - Typed Field Bag and Byte-Budget Splitter
//!
//! ## Purpose
//!
//! The user-facing object of the protocol: a named bag of optional typed
//! sensor fields plus a wrapping sequence number. Producers set fields and
//! hand the measurement to [`encode_advertisements`]; the receiving bridge
//! parses raw advertisement buffers back into measurements and reads fields
//! through typed accessors.
//!
//! ## Architecture Role
//!
//! ```text
//! Producer → [Measurement] → [ManufacturerData] → serialized packets
//!                 ↑                  ↓
//!           typed accessors    split() under byte budget
//! ```
//!
//! The measurement holds values in their packed wire form and decodes on
//! access, so the encode/decode boundary is explicit and there is no hidden
//! mutation through attribute access.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::codec::{decode_value, encode_value};
use crate::constants::{CONTAINER_HEADER_LEN, SPLIT_BASELINE};
use crate::container::ManufacturerData;
use crate::error::{ProtocolError, ProtocolResult};
use crate::field::{FieldDescriptor, FieldKey, FieldRegistry, SensorValue};
use crate::sequence::SequenceNumberGenerator;

const SEQUENCE_KEY: u16 = FieldKey::SequenceNumber as u16;

/// One logical multi-sensor sample
///
/// Sensor fields live in an insertion-ordered container in packed form; the
/// sequence number is held separately and materialized as the reserved entry
/// 0x0003 when the measurement crosses the wire boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    sequence_number: u8,
    fields: ManufacturerData,
}

/// One decoded field ready for a cloud feed sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub key: &'static str,
    pub value: SensorValue,
}

impl Measurement {
    pub fn new(sequence_number: u8) -> Self {
        Self {
            sequence_number,
            fields: ManufacturerData::new(),
        }
    }

    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        self.sequence_number = sequence_number;
    }

    /// Sensor field entries in insertion order, packed form
    pub fn container(&self) -> &ManufacturerData {
        &self.fields
    }

    /// Set a field by registered name, encoding it immediately
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<SensorValue>,
    ) -> ProtocolResult<()> {
        let descriptor = FieldRegistry::by_name(name)?;
        self.set_descriptor(descriptor, &value.into())
    }

    /// Set a field by typed key
    pub fn set(&mut self, key: FieldKey, value: impl Into<SensorValue>) -> ProtocolResult<()> {
        let descriptor = FieldRegistry::by_key(key)
            .ok_or_else(|| ProtocolError::UnknownField(format!("{:?}", key)))?;
        self.set_descriptor(descriptor, &value.into())
    }

    fn set_descriptor(
        &mut self,
        descriptor: &FieldDescriptor,
        value: &SensorValue,
    ) -> ProtocolResult<()> {
        let raw = encode_value(descriptor, value)?;
        self.fields.set(descriptor.key as u16, raw);
        Ok(())
    }

    /// Get a field by registered name, decoding its packed bytes.
    /// Returns `Ok(None)` when the field is not present in this measurement.
    pub fn get_field(&self, name: &str) -> ProtocolResult<Option<SensorValue>> {
        let descriptor = FieldRegistry::by_name(name)?;
        self.get_descriptor(descriptor)
    }

    /// Get a field by typed key
    pub fn get(&self, key: FieldKey) -> ProtocolResult<Option<SensorValue>> {
        match FieldRegistry::by_key(key) {
            Some(descriptor) => self.get_descriptor(descriptor),
            None => Ok(None),
        }
    }

    fn get_descriptor(&self, descriptor: &FieldDescriptor) -> ProtocolResult<Option<SensorValue>> {
        match self.fields.get(descriptor.key as u16) {
            Some(raw) => Ok(Some(decode_value(descriptor, raw)?)),
            None => Ok(None),
        }
    }

    /// Build the wire container: the sequence number entry first, then every
    /// sensor field in insertion order.
    pub fn to_container(&self) -> ManufacturerData {
        let mut container = ManufacturerData::new();
        container.set(SEQUENCE_KEY, vec![self.sequence_number]);
        for entry in self.fields.entries() {
            container.set(entry.key, entry.value.clone());
        }
        container
    }

    /// Rebuild a measurement from a parsed wire container.
    ///
    /// The sequence number entry is required; its absence fails with
    /// `MissingSequenceNumber`. Entries with keys outside the registry are
    /// retained in the container and simply never decode to a typed value.
    pub fn from_container(mut container: ManufacturerData) -> ProtocolResult<Self> {
        let raw = container
            .remove(SEQUENCE_KEY)
            .ok_or(ProtocolError::MissingSequenceNumber)?;
        if raw.len() != 1 {
            return Err(ProtocolError::TruncatedField {
                key: SEQUENCE_KEY,
                expected: 1,
                got: raw.len(),
            });
        }
        Ok(Self {
            sequence_number: raw[0],
            fields: container,
        })
    }

    /// Parse a raw received advertisement buffer in one step
    pub fn parse(buffer: &[u8]) -> ProtocolResult<Self> {
        Self::from_container(ManufacturerData::parse(buffer)?)
    }

    /// Serialize to a complete advertisement structure bounded by `max_len`
    pub fn serialize(&self, max_len: usize) -> ProtocolResult<Vec<u8>> {
        self.to_container().serialize(max_len)
    }

    /// Decoded (name, value) pairs for a cloud feed sink, registry order
    pub fn feed_entries(&self) -> Vec<FeedEntry> {
        FieldRegistry::all()
            .iter()
            .filter_map(|descriptor| {
                self.get_descriptor(descriptor)
                    .ok()
                    .flatten()
                    .map(|value| FeedEntry {
                        key: descriptor.name,
                        value,
                    })
            })
            .collect()
    }

    /// Partition this measurement's fields across sub-measurements so that
    /// every output satisfies `SPLIT_BASELINE + container.byte_length() <=
    /// max_packet_size`.
    ///
    /// A measurement that already fits is returned unchanged as the sole
    /// output. Field payloads are atomic: an entry that alone cannot fit any
    /// packet fails with `FieldTooLarge`. All outputs carry this
    /// measurement's sequence number; [`encode_advertisements`] stamps one
    /// fresh number across the whole batch so loss detection stays
    /// packet-granular.
    pub fn split(&self, max_packet_size: usize) -> ProtocolResult<Vec<Measurement>> {
        if SPLIT_BASELINE + self.fields.byte_length() <= max_packet_size {
            return Ok(vec![self.clone()]);
        }
        // Identity failed with nothing to shed: the budget cannot hold even
        // the baseline framing.
        if self.fields.is_empty() {
            return Err(ProtocolError::PayloadTooLarge {
                size: SPLIT_BASELINE + self.fields.byte_length(),
                max: max_packet_size,
            });
        }

        let mut parts = Vec::new();
        let mut current = Measurement::new(self.sequence_number);
        for entry in self.fields.entries() {
            let entry_len = entry.encoded_len();
            if SPLIT_BASELINE + CONTAINER_HEADER_LEN + entry_len > max_packet_size {
                return Err(ProtocolError::FieldTooLarge {
                    key: entry.key,
                    size: entry_len,
                    max: max_packet_size,
                });
            }
            if !current.fields.is_empty()
                && SPLIT_BASELINE + current.fields.byte_length() + entry_len > max_packet_size
            {
                parts.push(current);
                current = Measurement::new(self.sequence_number);
            }
            current.fields.set(entry.key, entry.value.clone());
        }
        parts.push(current);
        Ok(parts)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Measurement sequence_number={}", self.sequence_number)?;
        for descriptor in FieldRegistry::all() {
            if let Ok(Some(value)) = self.get_descriptor(descriptor) {
                write!(f, " {}={}", descriptor.name, value)?;
            }
        }
        write!(f, ">")
    }
}

/// Encode one logical measurement into transmit-ready advertisement packets.
///
/// Splits under the byte budget, stamps one fresh sequence number from the
/// caller's generator onto every sub-measurement, and serializes each. The
/// returned buffers go to the external transmit sink in order.
pub fn encode_advertisements(
    measurement: &Measurement,
    sequence: &mut SequenceNumberGenerator,
    max_packet_size: usize,
) -> ProtocolResult<Vec<Vec<u8>>> {
    let sequence_number = sequence.next();
    let parts = measurement.split(max_packet_size)?;
    if parts.len() > 1 {
        debug!(
            packets = parts.len(),
            sequence_number, "measurement split across multiple advertisements"
        );
    }

    let mut packets = Vec::with_capacity(parts.len());
    for mut part in parts {
        part.set_sequence_number(sequence_number);
        packets.push(part.serialize(max_packet_size)?);
    }
    Ok(packets)
}
