//! # Field Registry - BroadcastNet Sensor Field Catalog
//!
//! ## Purpose
//!
//! Central source of truth for every sensor field the protocol can carry:
//! its 16-bit TLV key, its binary layout, its component names, and its
//! human-readable name. The catalog is fixed at build time and shared
//! read-only by the codec, the container, and the measurement entity.
//!
//! ## Wire Contract
//!
//! Keys and layouts are part of the over-the-air contract. Sensor fields
//! occupy 0x0A00-0x0A16; key 0x0003 is reserved for the sequence number and
//! is always present on the wire. Keys must never be renumbered.

use num_enum::TryFromPrimitive;
use serde::Serialize;

use crate::error::{ProtocolError, ProtocolResult};

/// TLV key registry for BroadcastNet fields
///
/// One variant per assigned wire key. 0x0A0F (alarm) and 0x0A10 (datetime)
/// are unassigned in the wire contract and intentionally absent here.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum FieldKey {
    /// Wrapping packet counter used to detect missed packets. Reserved key,
    /// always present in a serialized measurement.
    SequenceNumber = 0x0003,

    /// Acceleration as (x, y, z) floats in meters per second squared.
    Acceleration = 0x0A00,
    /// Magnetic field as (x, y, z) floats in micro-Tesla.
    Magnetic = 0x0A01,
    /// Absolute orientation as (x, y, z) floats in degrees.
    Orientation = 0x0A02,
    /// Gyro motion as (x, y, z) floats in radians per second.
    Gyro = 0x0A03,
    /// Temperature as a float in degrees centigrade.
    Temperature = 0x0A04,
    /// Equivalent CO2 as a float in parts per million.
    Eco2 = 0x0A05,
    /// Total Volatile Organic Compounds as a float in parts per billion.
    Tvoc = 0x0A06,
    /// Distance as a float in centimeters.
    Distance = 0x0A07,
    /// Brightness as a float without units.
    Light = 0x0A08,
    /// Brightness as a float in SI lux.
    Lux = 0x0A09,
    /// Pressure as a float in hectopascals.
    Pressure = 0x0A0A,
    /// Relative humidity as a float percentage.
    RelativeHumidity = 0x0A0B,
    /// Current as a float in milliamps.
    Current = 0x0A0C,
    /// Voltage as a float in Volts.
    Voltage = 0x0A0D,
    /// Color as an RGB integer carried as a float.
    Color = 0x0A0E,
    /// 16-bit PWM duty cycle, independent of frequency.
    DutyCycle = 0x0A11,
    /// Frequency as integer Hertz carried as a float.
    Frequency = 0x0A12,
    /// Unit-less 16-bit value, used for analog readings and booleans.
    Value = 0x0A13,
    /// Weight as a float in grams.
    Weight = 0x0A14,
    /// Battery voltage in millivolts. Two bytes smaller than `Voltage` and
    /// more readable in bare packets.
    BatteryVoltage = 0x0A15,
    /// Sound level as a float.
    SoundLevel = 0x0A16,
}

/// Binary layout of one field value, little-endian throughout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// One 32-bit float (4 bytes)
    Float32,
    /// Three 32-bit floats, (x, y, z) order (12 bytes)
    Vector3Float32,
    /// One unsigned byte
    UInt8,
    /// One unsigned 16-bit integer (2 bytes)
    UInt16,
}

impl FieldLayout {
    /// Number of scalar components in this layout
    pub fn element_count(&self) -> usize {
        match self {
            FieldLayout::Vector3Float32 => 3,
            _ => 1,
        }
    }

    /// Serialized value size in bytes. Fixed per layout, never data-dependent.
    pub fn byte_size(&self) -> usize {
        match self {
            FieldLayout::Float32 => 4,
            FieldLayout::Vector3Float32 => 12,
            FieldLayout::UInt8 => 1,
            FieldLayout::UInt16 => 2,
        }
    }

    /// Component names for vector layouts; empty for scalars
    pub fn component_names(&self) -> &'static [&'static str] {
        match self {
            FieldLayout::Vector3Float32 => &["x", "y", "z"],
            _ => &[],
        }
    }
}

/// Static metadata for one registered field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub name: &'static str,
    pub layout: FieldLayout,
    /// Unit of measure, for diagnostics only
    pub units: &'static str,
}

impl FieldDescriptor {
    pub fn element_count(&self) -> usize {
        self.layout.element_count()
    }

    pub fn byte_size(&self) -> usize {
        self.layout.byte_size()
    }
}

/// Sensor field catalog in wire-key order. This order is the enumeration
/// order used for serialization and rendering; the sequence number is not a
/// sensor field and lives outside the catalog.
const CATALOG: &[FieldDescriptor] = &[
    FieldDescriptor { key: FieldKey::Acceleration, name: "acceleration", layout: FieldLayout::Vector3Float32, units: "m/s^2" },
    FieldDescriptor { key: FieldKey::Magnetic, name: "magnetic", layout: FieldLayout::Vector3Float32, units: "uT" },
    FieldDescriptor { key: FieldKey::Orientation, name: "orientation", layout: FieldLayout::Vector3Float32, units: "degrees" },
    FieldDescriptor { key: FieldKey::Gyro, name: "gyro", layout: FieldLayout::Vector3Float32, units: "rad/s" },
    FieldDescriptor { key: FieldKey::Temperature, name: "temperature", layout: FieldLayout::Float32, units: "degC" },
    FieldDescriptor { key: FieldKey::Eco2, name: "eCO2", layout: FieldLayout::Float32, units: "ppm" },
    FieldDescriptor { key: FieldKey::Tvoc, name: "TVOC", layout: FieldLayout::Float32, units: "ppb" },
    FieldDescriptor { key: FieldKey::Distance, name: "distance", layout: FieldLayout::Float32, units: "cm" },
    FieldDescriptor { key: FieldKey::Light, name: "light", layout: FieldLayout::Float32, units: "" },
    FieldDescriptor { key: FieldKey::Lux, name: "lux", layout: FieldLayout::Float32, units: "lux" },
    FieldDescriptor { key: FieldKey::Pressure, name: "pressure", layout: FieldLayout::Float32, units: "hPa" },
    FieldDescriptor { key: FieldKey::RelativeHumidity, name: "relative_humidity", layout: FieldLayout::Float32, units: "%" },
    FieldDescriptor { key: FieldKey::Current, name: "current", layout: FieldLayout::Float32, units: "mA" },
    FieldDescriptor { key: FieldKey::Voltage, name: "voltage", layout: FieldLayout::Float32, units: "V" },
    FieldDescriptor { key: FieldKey::Color, name: "color", layout: FieldLayout::Float32, units: "" },
    FieldDescriptor { key: FieldKey::DutyCycle, name: "duty_cycle", layout: FieldLayout::Float32, units: "" },
    FieldDescriptor { key: FieldKey::Frequency, name: "frequency", layout: FieldLayout::Float32, units: "Hz" },
    FieldDescriptor { key: FieldKey::Value, name: "value", layout: FieldLayout::Float32, units: "" },
    FieldDescriptor { key: FieldKey::Weight, name: "weight", layout: FieldLayout::Float32, units: "g" },
    FieldDescriptor { key: FieldKey::BatteryVoltage, name: "battery_voltage", layout: FieldLayout::UInt16, units: "mV" },
    FieldDescriptor { key: FieldKey::SoundLevel, name: "sound_level", layout: FieldLayout::Float32, units: "" },
];

/// Registry for field metadata lookup and enumeration
pub struct FieldRegistry;

impl FieldRegistry {
    /// All registered sensor fields in enumeration (wire-key) order
    pub fn all() -> &'static [FieldDescriptor] {
        CATALOG
    }

    /// Look up a field by its registered name
    pub fn by_name(name: &str) -> ProtocolResult<&'static FieldDescriptor> {
        CATALOG
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ProtocolError::UnknownField(name.to_string()))
    }

    /// Look up a field by its typed key. The sequence number key has no
    /// catalog entry; it is framing, not a sensor field.
    pub fn by_key(key: FieldKey) -> Option<&'static FieldDescriptor> {
        CATALOG.iter().find(|d| d.key == key)
    }

    /// Look up a field by its raw wire key
    pub fn by_raw_key(key: u16) -> Option<&'static FieldDescriptor> {
        FieldKey::try_from(key).ok().and_then(Self::by_key)
    }
}

/// Decoded value of one sensor field
///
/// `Unsigned` carries the widest accepted integer; the codec checks it
/// against the field's declared width at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Float(f32),
    Vector([f32; 3]),
    Unsigned(u32),
}

impl SensorValue {
    /// Number of scalar components in this value
    pub fn element_count(&self) -> usize {
        match self {
            SensorValue::Vector(_) => 3,
            _ => 1,
        }
    }
}

impl From<f32> for SensorValue {
    fn from(v: f32) -> Self {
        SensorValue::Float(v)
    }
}

impl From<[f32; 3]> for SensorValue {
    fn from(v: [f32; 3]) -> Self {
        SensorValue::Vector(v)
    }
}

impl From<(f32, f32, f32)> for SensorValue {
    fn from(v: (f32, f32, f32)) -> Self {
        SensorValue::Vector([v.0, v.1, v.2])
    }
}

impl From<u8> for SensorValue {
    fn from(v: u8) -> Self {
        SensorValue::Unsigned(v as u32)
    }
}

impl From<u16> for SensorValue {
    fn from(v: u16) -> Self {
        SensorValue::Unsigned(v as u32)
    }
}

impl From<u32> for SensorValue {
    fn from(v: u32) -> Self {
        SensorValue::Unsigned(v)
    }
}

impl std::fmt::Display for SensorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorValue::Float(v) => write!(f, "{}", v),
            SensorValue::Vector([x, y, z]) => write!(f, "({}, {}, {})", x, y, z),
            SensorValue::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_keys_unique() {
        let mut seen = HashSet::new();
        for descriptor in FieldRegistry::all() {
            assert!(
                seen.insert(descriptor.key as u16),
                "duplicate key {:#06x}",
                descriptor.key as u16
            );
        }
    }

    #[test]
    fn test_catalog_key_range() {
        for descriptor in FieldRegistry::all() {
            let key = descriptor.key as u16;
            assert!((0x0A00..=0x0A16).contains(&key), "key {:#06x} outside catalog range", key);
        }
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(FieldLayout::Float32.byte_size(), 4);
        assert_eq!(FieldLayout::Vector3Float32.byte_size(), 12);
        assert_eq!(FieldLayout::UInt8.byte_size(), 1);
        assert_eq!(FieldLayout::UInt16.byte_size(), 2);
        assert_eq!(FieldLayout::Vector3Float32.element_count(), 3);
        assert_eq!(FieldLayout::Vector3Float32.component_names(), &["x", "y", "z"]);
        assert!(FieldLayout::Float32.component_names().is_empty());
    }

    #[test]
    fn test_by_name_lookup() {
        let temperature = FieldRegistry::by_name("temperature").unwrap();
        assert_eq!(temperature.key, FieldKey::Temperature);
        assert_eq!(temperature.layout, FieldLayout::Float32);
        assert_eq!(temperature.byte_size(), 4);

        match FieldRegistry::by_name("barometric_wizardry") {
            Err(ProtocolError::UnknownField(name)) => assert_eq!(name, "barometric_wizardry"),
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_by_raw_key_lookup() {
        assert_eq!(
            FieldRegistry::by_raw_key(0x0A15).unwrap().name,
            "battery_voltage"
        );
        // Sequence number is a valid key but not a sensor field
        assert!(FieldRegistry::by_raw_key(0x0003).is_none());
        // Unassigned keys
        assert!(FieldRegistry::by_raw_key(0x0A0F).is_none());
        assert!(FieldRegistry::by_raw_key(0x1234).is_none());
    }

    #[test]
    fn test_try_from_primitive() {
        assert_eq!(FieldKey::try_from(0x0A04u16).unwrap(), FieldKey::Temperature);
        assert_eq!(FieldKey::try_from(0x0003u16).unwrap(), FieldKey::SequenceNumber);
        assert!(FieldKey::try_from(0x0A10u16).is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(SensorValue::from(21.5f32).to_string(), "21.5");
        assert_eq!(SensorValue::from([1.0, 2.0, 3.0]).to_string(), "(1, 2, 3)");
        assert_eq!(SensorValue::from(3300u16).to_string(), "3300");
    }
}
