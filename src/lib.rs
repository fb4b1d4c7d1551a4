//! # BroadcastNet Protocol Codec
//!
//! ## Purpose
//!
//! This crate contains the "rules" layer of a BroadcastNet sensor network:
//! the compact TLV binary encoding for multi-sensor telemetry carried in BLE
//! advertisement manufacturer-data fields, the byte-budget-aware splitter
//! that partitions an over-sized measurement across multiple advertisements,
//! and the sequence-number protocol a receiving bridge uses to detect lost
//! packets.
//!
//! ## What This Crate Contains
//!
//! - **Field Registry**: the fixed catalog of sensor field keys and layouts
//! - **TLV Codec**: per-field little-endian value packing and entry framing
//! - **Manufacturer-Data Container**: ordered payload assembly and parsing
//! - **Measurement**: the typed, user-facing sample object and its splitter
//! - **Sequence Tracking**: transmit-side counter and bridge-side gap table
//!
//! ## What This Crate Does NOT Contain
//!
//! - Radio control (advertising, scanning) — external collaborators hand raw
//!   buffers in and take serialized buffers out
//! - Sensor hardware drivers
//! - Cloud feed transport; [`Measurement::feed_entries`] produces the values,
//!   HTTP belongs to the bridge
//!
//! ## Architecture Role
//!
//! ```text
//! sensors → Measurement → split() → serialized packets → BLE transmitter
//!                                                            ↓ (air gap)
//! cloud feed ← feed_entries() ← Measurement ← parse() ← BLE scanner
//!                   ↑
//!            SequenceTracker (missed-packet accounting per sender)
//! ```
//!
//! Loss is detected, never recovered: there is no acknowledgment path, so the
//! tracker reports gaps and the bridge decides what to do with them.

pub mod codec;
pub mod constants;
pub mod container;
pub mod error;
pub mod field;
pub mod measurement;
pub mod sequence;

pub use codec::{decode_entry, decode_value, encode_entry, encode_value};
pub use constants::{
    COMPANY_ID, EXTENDED_ADVERTISEMENT_MAX, LEGACY_ADVERTISEMENT_MAX, MANUFACTURER_DATA_TYPE,
    MATCH_PREFIX, SPLIT_BASELINE,
};
pub use container::{ManufacturerData, ManufacturerDataEntry};
pub use error::{ProtocolError, ProtocolResult};
pub use field::{FieldDescriptor, FieldKey, FieldLayout, FieldRegistry, SensorValue};
pub use measurement::{encode_advertisements, FeedEntry, Measurement};
pub use sequence::{SenderAddress, SequenceNumberGenerator, SequenceTracker};
