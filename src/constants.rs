//! # Protocol Constants - BroadcastNet Wire Format Constants
//!
//! ## Purpose
//!
//! Central registry of wire-level constants for the BroadcastNet advertisement
//! format. These values are part of the over-the-air contract and must remain
//! stable across every sensor node and bridge that speaks the protocol.
//!
//! ## Integration Points
//!
//! - **Advertisement Framing**: data type tag and company identifier open
//!   every serialized container
//! - **Advertisement Filtering**: `MATCH_PREFIX` recognizes BroadcastNet
//!   payloads among mixed scan traffic before a full parse
//! - **Size Budgeting**: advertisement ceilings and framing overheads feed the
//!   splitter's byte accounting

/// BLE advertisement data type for manufacturer-specific data.
///
/// Every BroadcastNet payload is carried inside a manufacturer-specific-data
/// advertisement structure, so this tag is the second byte of every frame.
pub const MANUFACTURER_DATA_TYPE: u8 = 0xFF;

/// Registered company identifier carried in every payload (little-endian on
/// the wire). Distinguishes BroadcastNet traffic from other vendors' use of
/// the manufacturer-data structure.
pub const COMPANY_ID: u16 = 0x0822;

/// Maximum serialized payload for a legacy advertisement.
pub const LEGACY_ADVERTISEMENT_MAX: usize = 31;

/// Maximum serialized payload for an extended advertisement.
pub const EXTENDED_ADVERTISEMENT_MAX: usize = 252;

/// Bytes of framing before the first entry: structure length, data type tag,
/// and the two-byte company identifier.
pub const CONTAINER_HEADER_LEN: usize = 4;

/// Per-entry framing: one length byte plus the two-byte field key.
pub const ENTRY_HEADER_LEN: usize = 3;

/// Fixed overhead the splitter reserves in every packet: container framing
/// plus the sequence number entry that every sub-measurement carries.
pub const SPLIT_BASELINE: usize = 8;

/// Bytes that follow the structure-length byte in every BroadcastNet frame:
/// the manufacturer-data tag, the company identifier, and the header of the
/// always-present sequence number entry (length 3, key 0x0003).
pub const MATCH_PREFIX: [u8; 6] = [0xFF, 0x22, 0x08, 0x03, 0x03, 0x00];
