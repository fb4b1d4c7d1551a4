//! # TLV Value Codec - Per-Field Binary Packing
//!
//! ## Purpose
//!
//! Serializes and deserializes a single field value to and from its fixed
//! little-endian byte layout, and frames values as tag-length-value entries
//! for the manufacturer-data container. All layout knowledge comes from the
//! field registry; the codec itself is layout-driven and allocation-light.
//!
//! ## Integration Points
//!
//! - **Input**: typed [`SensorValue`]s from producers, or raw entry bytes
//!   from received advertisement frames
//! - **Output**: packed value bytes for the container, or decoded values for
//!   the measurement accessors
//! - **Validation**: arity/kind checks against the descriptor, integer range
//!   checks against the declared width, truncation bounds checks on decode

use crate::container::ManufacturerDataEntry;
use crate::error::{ProtocolError, ProtocolResult};
use crate::field::{FieldDescriptor, FieldLayout, SensorValue};

/// Pack one value into its little-endian wire bytes per the field layout.
///
/// Integer inputs are accepted for float layouts (coerced to f32). A shape
/// mismatch between the supplied value and the layout fails with
/// `ValueArityMismatch`; an integer wider than the declared field width
/// fails with `ValueRangeError`.
pub fn encode_value(descriptor: &FieldDescriptor, value: &SensorValue) -> ProtocolResult<Vec<u8>> {
    let key = descriptor.key as u16;
    match (descriptor.layout, value) {
        (FieldLayout::Float32, SensorValue::Float(v)) => Ok(v.to_le_bytes().to_vec()),
        (FieldLayout::Float32, SensorValue::Unsigned(v)) => Ok((*v as f32).to_le_bytes().to_vec()),
        (FieldLayout::Vector3Float32, SensorValue::Vector([x, y, z])) => {
            let mut raw = Vec::with_capacity(12);
            raw.extend_from_slice(&x.to_le_bytes());
            raw.extend_from_slice(&y.to_le_bytes());
            raw.extend_from_slice(&z.to_le_bytes());
            Ok(raw)
        }
        (FieldLayout::UInt8, SensorValue::Unsigned(v)) => {
            if *v > u8::MAX as u32 {
                return Err(ProtocolError::ValueRangeError {
                    key,
                    max: u8::MAX as u32,
                    got: *v,
                });
            }
            Ok(vec![*v as u8])
        }
        (FieldLayout::UInt16, SensorValue::Unsigned(v)) => {
            if *v > u16::MAX as u32 {
                return Err(ProtocolError::ValueRangeError {
                    key,
                    max: u16::MAX as u32,
                    got: *v,
                });
            }
            Ok((*v as u16).to_le_bytes().to_vec())
        }
        _ => Err(ProtocolError::ValueArityMismatch {
            key,
            expected: descriptor.element_count(),
            got: value.element_count(),
        }),
    }
}

/// Unpack wire bytes into a typed value per the field layout.
///
/// `raw` must be exactly the descriptor's byte size; anything else is a
/// `TruncatedField`.
pub fn decode_value(descriptor: &FieldDescriptor, raw: &[u8]) -> ProtocolResult<SensorValue> {
    if raw.len() != descriptor.byte_size() {
        return Err(ProtocolError::TruncatedField {
            key: descriptor.key as u16,
            expected: descriptor.byte_size(),
            got: raw.len(),
        });
    }

    let value = match descriptor.layout {
        FieldLayout::Float32 => {
            SensorValue::Float(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
        }
        FieldLayout::Vector3Float32 => SensorValue::Vector([
            f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            f32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
            f32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
        ]),
        FieldLayout::UInt8 => SensorValue::Unsigned(raw[0] as u32),
        FieldLayout::UInt16 => SensorValue::Unsigned(u16::from_le_bytes([raw[0], raw[1]]) as u32),
    };
    Ok(value)
}

/// Encode one value as a keyed container entry
pub fn encode_entry(
    descriptor: &FieldDescriptor,
    value: &SensorValue,
) -> ProtocolResult<ManufacturerDataEntry> {
    let raw = encode_value(descriptor, value)?;
    Ok(ManufacturerDataEntry {
        key: descriptor.key as u16,
        value: raw,
    })
}

/// Decode one TLV entry from a frame at the given offset.
///
/// Reads the one-byte entry length (which covers the two-byte key plus the
/// value), then the key and value bytes. Returns the entry and the offset of
/// the next one. Insufficient remaining bytes fail with `TruncatedFrame`.
pub fn decode_entry(
    frame: &[u8],
    offset: usize,
) -> ProtocolResult<(ManufacturerDataEntry, usize)> {
    let available = frame.len().saturating_sub(offset);
    if available < 1 {
        return Err(ProtocolError::TruncatedFrame {
            offset,
            need: 1,
            available,
        });
    }

    let entry_len = frame[offset] as usize;
    // The length must at least cover the key
    if entry_len < 2 {
        return Err(ProtocolError::TruncatedFrame {
            offset,
            need: 3,
            available: 1 + entry_len,
        });
    }
    if available < 1 + entry_len {
        return Err(ProtocolError::TruncatedFrame {
            offset,
            need: 1 + entry_len,
            available,
        });
    }

    let key = u16::from_le_bytes([frame[offset + 1], frame[offset + 2]]);
    let value = frame[offset + 3..offset + 1 + entry_len].to_vec();

    Ok((ManufacturerDataEntry { key, value }, offset + 1 + entry_len))
}
