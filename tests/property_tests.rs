//! Property-based tests for the value-reader tree.
//!
//! These tests use proptest to verify universal properties across many
//! generated inputs: primitive round-trips, promotion equivalence,
//! skip-equivalence, and position-counter behavior.

use std::collections::HashMap;

use proptest::prelude::*;

use floe::decoder::{encode_zigzag, BinaryDecoder};
use floe::reader::{self, planned_reader_for, ValueReader};
use floe::schema::{AvroSchema, FieldSchema, FieldType, NestedField, RecordSchema, StructType};
use floe::value::Value;

// ============================================================================
// Encoding helpers
// ============================================================================

fn encode_string(s: &str) -> Vec<u8> {
    let mut data = encode_zigzag(s.len() as i64);
    data.extend(s.as_bytes());
    data
}

fn encode_bytes(b: &[u8]) -> Vec<u8> {
    let mut data = encode_zigzag(b.len() as i64);
    data.extend(b);
    data
}

/// Encode longs as an array, splitting the items into `chunks` chunks.
fn encode_long_array_chunked(values: &[i64], chunks: usize) -> Vec<u8> {
    let mut data = Vec::new();
    if !values.is_empty() {
        let chunk_size = values.len().div_ceil(chunks.max(1));
        for chunk in values.chunks(chunk_size) {
            data.extend(encode_zigzag(chunk.len() as i64));
            for v in chunk {
                data.extend(encode_zigzag(*v));
            }
        }
    }
    data.extend(encode_zigzag(0));
    data
}

// ============================================================================
// Primitive round-trips
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_long_round_trip(value in any::<i64>()) {
        let data = encode_zigzag(value);
        let mut dec = BinaryDecoder::new(&data);
        let mut longs = reader::longs();
        prop_assert_eq!(longs.read(&mut dec, None).unwrap(), Value::Long(value));
        prop_assert!(dec.is_empty());
    }

    #[test]
    fn prop_int_round_trip(value in any::<i32>()) {
        let data = encode_zigzag(value as i64);
        let mut dec = BinaryDecoder::new(&data);
        let mut ints = reader::ints();
        prop_assert_eq!(ints.read(&mut dec, None).unwrap(), Value::Int(value));
    }

    #[test]
    fn prop_boolean_round_trip(value in any::<bool>()) {
        let data = [value as u8];
        let mut dec = BinaryDecoder::new(&data);
        let mut booleans = reader::booleans();
        prop_assert_eq!(booleans.read(&mut dec, None).unwrap(), Value::Boolean(value));
    }

    #[test]
    fn prop_float_round_trip_bit_exact(value in any::<f32>()) {
        let data = value.to_le_bytes();
        let mut dec = BinaryDecoder::new(&data);
        let mut floats = reader::floats();
        match floats.read(&mut dec, None).unwrap() {
            Value::Float(decoded) => prop_assert_eq!(decoded.to_bits(), value.to_bits()),
            other => prop_assert!(false, "expected float, got {:?}", other),
        }
    }

    #[test]
    fn prop_double_round_trip_bit_exact(value in any::<f64>()) {
        let data = value.to_le_bytes();
        let mut dec = BinaryDecoder::new(&data);
        let mut doubles = reader::doubles();
        match doubles.read(&mut dec, None).unwrap() {
            Value::Double(decoded) => prop_assert_eq!(decoded.to_bits(), value.to_bits()),
            other => prop_assert!(false, "expected double, got {:?}", other),
        }
    }

    #[test]
    fn prop_string_round_trip(value in ".{0,64}") {
        let data = encode_string(&value);
        let mut dec = BinaryDecoder::new(&data);
        let mut strings = reader::strings();
        prop_assert_eq!(strings.read(&mut dec, None).unwrap(), Value::String(value));
    }

    #[test]
    fn prop_bytes_round_trip(value in proptest::collection::vec(any::<u8>(), 0..64)) {
        let data = encode_bytes(&value);
        let mut dec = BinaryDecoder::new(&data);
        let mut bytes = reader::bytes();
        prop_assert_eq!(bytes.read(&mut dec, None).unwrap(), Value::Bytes(value));
    }
}

// ============================================================================
// Promotions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_int_to_long_promotion(value in any::<i32>()) {
        let data = encode_zigzag(value as i64);
        let mut dec = BinaryDecoder::new(&data);
        let mut widened = reader::ints_as_longs();
        prop_assert_eq!(
            widened.read(&mut dec, None).unwrap(),
            Value::Long(value as i64)
        );
    }

    #[test]
    fn prop_float_to_double_promotion(value in any::<f32>()) {
        let data = value.to_le_bytes();
        let mut dec = BinaryDecoder::new(&data);
        let mut widened = reader::floats_as_doubles();
        match widened.read(&mut dec, None).unwrap() {
            Value::Double(decoded) => {
                prop_assert_eq!(decoded.to_bits(), (value as f64).to_bits())
            }
            other => prop_assert!(false, "expected double, got {:?}", other),
        }
    }
}

// ============================================================================
// Skip-equivalence
// ============================================================================

fn two_field_schemas() -> (StructType, RecordSchema) {
    let expected = StructType::new(vec![
        NestedField::required(1, "a", FieldType::Long),
        NestedField::required(2, "b", FieldType::String),
    ]);
    let writer = RecordSchema::new(
        "row",
        vec![
            FieldSchema::new("a", AvroSchema::Long).with_field_id(1),
            FieldSchema::new("b", AvroSchema::String).with_field_id(2),
        ],
    );
    (expected, writer)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Reading a record and skipping a record advance the decoder to the
    /// same position, so the second record decodes identically after either.
    #[test]
    fn prop_skip_equivalence(
        a1 in any::<i64>(),
        b1 in ".{0,32}",
        a2 in any::<i64>(),
        b2 in ".{0,32}",
    ) {
        let (expected, writer) = two_field_schemas();

        let mut data = encode_zigzag(a1);
        data.extend(encode_string(&b1));
        data.extend(encode_zigzag(a2));
        data.extend(encode_string(&b2));

        let mut read_reader = planned_reader_for(&expected, &writer, &HashMap::new()).unwrap();
        let mut skip_reader = planned_reader_for(&expected, &writer, &HashMap::new()).unwrap();

        let mut dec_after_read = BinaryDecoder::new(&data);
        read_reader.read(&mut dec_after_read, None).unwrap();

        let mut dec_after_skip = BinaryDecoder::new(&data);
        skip_reader.skip(&mut dec_after_skip).unwrap();

        prop_assert_eq!(dec_after_read.position(), dec_after_skip.position());

        let second_after_read = read_reader.read(&mut dec_after_read, None).unwrap();
        let second_after_skip = skip_reader.read(&mut dec_after_skip, None).unwrap();
        prop_assert_eq!(second_after_read, second_after_skip);
        prop_assert!(dec_after_read.is_empty());
        prop_assert!(dec_after_skip.is_empty());
    }

    #[test]
    fn prop_list_chunking_is_invisible(
        values in proptest::collection::vec(any::<i64>(), 0..32),
        chunks in 1usize..4,
    ) {
        let one_chunk = encode_long_array_chunked(&values, 1);
        let many_chunks = encode_long_array_chunked(&values, chunks);

        let mut list = reader::list(reader::longs());
        let mut dec = BinaryDecoder::new(&one_chunk);
        let from_one = list.read(&mut dec, None).unwrap();

        let mut list = reader::list(reader::longs());
        let mut dec = BinaryDecoder::new(&many_chunks);
        let from_many = list.read(&mut dec, None).unwrap();

        prop_assert_eq!(from_one, from_many);
    }
}

// ============================================================================
// Positions and constants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After supplier injection the first N reads return s(), s()+1, ...
    #[test]
    fn prop_position_reader_monotonic(start in 0i64..1_000_000, count in 1usize..20) {
        let mut positions = reader::positions();
        positions.set_row_position_supplier(&move || start);

        let mut dec = BinaryDecoder::new(&[]);
        for offset in 0..count {
            prop_assert_eq!(
                positions.read(&mut dec, None).unwrap(),
                Value::Long(start + offset as i64)
            );
        }
    }

    /// A constant-mapped field decodes to the constant, never the file value.
    #[test]
    fn prop_constant_wins(file_value in any::<i32>(), constant_value in any::<i32>()) {
        let expected = StructType::new(vec![NestedField::required(9, "p", FieldType::Int)]);
        let writer = RecordSchema::new(
            "row",
            vec![FieldSchema::new("p", AvroSchema::Int).with_field_id(9)],
        );
        let constants = HashMap::from([(9, Value::Int(constant_value))]);

        let data = encode_zigzag(file_value as i64);
        let mut reader = planned_reader_for(&expected, &writer, &constants).unwrap();
        let mut dec = BinaryDecoder::new(&data);

        match reader.read(&mut dec, None).unwrap() {
            Value::Struct(row) => {
                prop_assert_eq!(row.get(0), &Value::Int(constant_value));
            }
            other => prop_assert!(false, "expected struct, got {:?}", other),
        }
        // the file value is consumed either way
        prop_assert!(dec.is_empty());
    }
}
