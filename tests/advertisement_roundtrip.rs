//! End-to-end protocol tests: producer → splitter → wire → bridge, plus
//! property tests over the parse and round-trip paths.

use proptest::prelude::*;

use broadcastnet_codec::{
    decode_value, encode_advertisements, encode_value, FieldRegistry, ManufacturerData,
    Measurement, ProtocolError, SenderAddress, SensorValue, SequenceNumberGenerator,
    SequenceTracker, LEGACY_ADVERTISEMENT_MAX, SPLIT_BASELINE,
};

fn multi_sensor_sample() -> Measurement {
    let mut m = Measurement::new(0);
    m.set_field("acceleration", [0.0f32, 0.1, 9.8]).unwrap();
    m.set_field("magnetic", [23.0f32, -4.5, 40.25]).unwrap();
    m.set_field("gyro", [0.01f32, 0.02, 0.03]).unwrap();
    m.set_field("temperature", 21.5f32).unwrap();
    m.set_field("relative_humidity", 40.0f32).unwrap();
    m.set_field("pressure", 1013.25f32).unwrap();
    m.set_field("battery_voltage", 3300u16).unwrap();
    m
}

#[test]
fn producer_to_bridge_round_trip() {
    let sender = SenderAddress::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    let mut generator = SequenceNumberGenerator::new();
    let mut tracker = SequenceTracker::new();

    let packets = encode_advertisements(
        &multi_sensor_sample(),
        &mut generator,
        LEGACY_ADVERTISEMENT_MAX,
    )
    .unwrap();
    assert!(packets.len() > 1, "sample should not fit one legacy packet");

    let mut decoded_fields = Vec::new();
    for packet in &packets {
        assert!(packet.len() <= LEGACY_ADVERTISEMENT_MAX);
        assert!(ManufacturerData::matches_prefix(packet));

        let measurement = Measurement::parse(packet).unwrap();
        let missed = tracker
            .observe(sender, measurement.sequence_number())
            .unwrap();
        assert_eq!(missed, 0);
        decoded_fields.extend(measurement.feed_entries());
    }
    // One confirm per logical sample: all packets carried the same number
    tracker.confirm(sender, 0);

    let names: Vec<_> = decoded_fields.iter().map(|e| e.key).collect();
    assert_eq!(decoded_fields.len(), 7);
    assert!(names.contains(&"acceleration"));
    assert!(names.contains(&"battery_voltage"));

    // The next batch advances the sequence number by one; no loss reported
    let packets = encode_advertisements(
        &multi_sensor_sample(),
        &mut generator,
        LEGACY_ADVERTISEMENT_MAX,
    )
    .unwrap();
    let measurement = Measurement::parse(&packets[0]).unwrap();
    assert_eq!(measurement.sequence_number(), 1);
    assert_eq!(tracker.observe(sender, 1).unwrap(), 0);
}

#[test]
fn lost_batch_is_counted() {
    let sender = SenderAddress::new([0xAA; 6]);
    let mut tracker = SequenceTracker::new();

    tracker.observe(sender, 3).unwrap();
    tracker.confirm(sender, 3);
    // Batches 4 and 5 never arrive
    assert_eq!(tracker.observe(sender, 6).unwrap(), 2);
}

#[test]
fn duplicate_broadcast_is_a_filter_signal() {
    let sender = SenderAddress::new([0xBB; 6]);
    let mut tracker = SequenceTracker::new();
    let mut m = Measurement::new(12);
    m.set_field("lux", 880.0f32).unwrap();
    let packet = m.serialize(LEGACY_ADVERTISEMENT_MAX).unwrap();

    // The same advertisement is typically received several times per
    // broadcast window; only the first consumption counts.
    let first = Measurement::parse(&packet).unwrap();
    tracker.observe(sender, first.sequence_number()).unwrap();
    tracker.confirm(sender, first.sequence_number());

    let again = Measurement::parse(&packet).unwrap();
    assert_eq!(
        tracker.observe(sender, again.sequence_number()),
        Err(ProtocolError::DuplicatePacket { sequence: 12 })
    );
}

#[test]
fn feed_entries_serialize_for_the_cloud_sink() {
    let mut m = Measurement::new(0);
    m.set_field("temperature", 21.5f32).unwrap();
    m.set_field("battery_voltage", 3300u16).unwrap();

    let json = serde_json::to_string(&m.feed_entries()).unwrap();
    assert_eq!(
        json,
        r#"[{"key":"temperature","value":21.5},{"key":"battery_voltage","value":3300}]"#
    );
}

fn arbitrary_scalar_value() -> impl Strategy<Value = (&'static str, SensorValue)> {
    prop_oneof![
        (-1000.0f32..1000.0).prop_map(|v| ("temperature", SensorValue::Float(v))),
        (0u32..=65_535).prop_map(|v| ("battery_voltage", SensorValue::Unsigned(v))),
        prop::array::uniform3(-100.0f32..100.0)
            .prop_map(|v| ("acceleration", SensorValue::Vector(v))),
    ]
}

proptest! {
    #[test]
    fn parse_never_panics_on_arbitrary_bytes(buffer in prop::collection::vec(any::<u8>(), 0..64)) {
        // Either outcome is fine; reaching it without panicking is the property
        let _ = ManufacturerData::parse(&buffer);
        let _ = Measurement::parse(&buffer);
        let _ = ManufacturerData::matches_prefix(&buffer);
    }

    #[test]
    fn parse_never_panics_on_corrupted_valid_frames(
        index in 0usize..15,
        byte in any::<u8>(),
    ) {
        let mut m = Measurement::new(1);
        m.set_field("temperature", 21.5f32).unwrap();
        let mut bytes = m.serialize(LEGACY_ADVERTISEMENT_MAX).unwrap();
        bytes[index] = byte;
        let _ = Measurement::parse(&bytes);
    }

    #[test]
    fn value_round_trip((name, value) in arbitrary_scalar_value()) {
        let descriptor = FieldRegistry::by_name(name).unwrap();
        let raw = encode_value(descriptor, &value).unwrap();
        prop_assert_eq!(raw.len(), descriptor.byte_size());
        prop_assert_eq!(decode_value(descriptor, &raw).unwrap(), value);
    }

    #[test]
    // 27 is the smallest packet that can hold the largest (vector) entry
    fn split_respects_any_feasible_budget(budget in 27usize..=64, sequence in any::<u8>()) {
        let mut m = multi_sensor_sample();
        m.set_sequence_number(sequence);

        let parts = m.split(budget).unwrap();
        let mut total_entries = 0;
        for part in &parts {
            prop_assert!(SPLIT_BASELINE + part.container().byte_length() <= budget);
            prop_assert_eq!(part.sequence_number(), sequence);
            total_entries += part.container().len();
        }
        prop_assert_eq!(total_entries, m.container().len());
    }

    #[test]
    fn serialized_frames_always_parse_back(sequence in any::<u8>(), temperature in -50.0f32..100.0) {
        let mut m = Measurement::new(sequence);
        m.set_field("temperature", temperature).unwrap();
        let bytes = m.serialize(LEGACY_ADVERTISEMENT_MAX).unwrap();
        let parsed = Measurement::parse(&bytes).unwrap();
        prop_assert_eq!(parsed, m);
    }
}
