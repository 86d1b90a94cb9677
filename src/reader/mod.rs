//! The value-reader tree.
//!
//! A complete decoder for a record is a tree of [`ValueReader`] nodes, each
//! handling one Avro construct, composed to mirror the expected projection.
//! The root struct reader pulls one logical row per call; child readers pull
//! their sub-values. Readers are stateful cursors and are not safe for
//! concurrent use; parallelism comes from independent trees.
//!
//! The free functions below are the construction surface: one constructor
//! per reader kind, returning boxed nodes ready for composition.

pub mod build;
pub mod constants;
pub mod containers;
pub mod logical;
pub mod plan;
pub mod position;
pub mod primitives;
pub mod structs;

pub use build::planned_reader_for;
pub use plan::{
    build_read_plan, build_read_plan_with, materialize_default, DefaultConverter, ReadPlan,
};
pub use structs::{PlannedStructReader, SkipStructReader, StructReader};

use crate::decoder::Decoder;
use crate::error::{DecodeError, PlanError};
use crate::schema::AvroSchema;
use crate::value::Value;

/// A node in the reader tree.
///
/// `read` decodes one value, optionally recycling `reuse` (a hint, not a
/// contract: a reader may ignore it, and a shape mismatch silently falls
/// back to allocation). `skip` advances the decoder past one value without
/// materializing it.
///
/// Readers whose value depends on the row index override
/// `set_row_position_supplier`; the supplier returns the position of the row
/// about to be read. Struct readers propagate the call down the tree.
pub trait ValueReader: Send {
    /// Decode one value, consuming its bytes.
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError>;

    /// Advance the decoder past one value.
    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError>;

    /// Inject the row-position producer. Default: not position-aware.
    fn set_row_position_supplier(&mut self, _supplier: &dyn Fn() -> i64) {}
}

impl std::fmt::Debug for dyn ValueReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ValueReader")
    }
}

/// A boxed reader-tree node.
pub type BoxedReader = Box<dyn ValueReader>;

/// Reader for nulls.
pub fn nulls() -> BoxedReader {
    Box::new(primitives::NullReader)
}

/// Reader for booleans.
pub fn booleans() -> BoxedReader {
    Box::new(primitives::BooleanReader)
}

/// Reader for ints.
pub fn ints() -> BoxedReader {
    Box::new(primitives::IntReader)
}

/// Reader for int-encoded values widened to long.
pub fn ints_as_longs() -> BoxedReader {
    Box::new(primitives::IntAsLongReader)
}

/// Reader for longs.
pub fn longs() -> BoxedReader {
    Box::new(primitives::LongReader)
}

/// Reader for floats.
pub fn floats() -> BoxedReader {
    Box::new(primitives::FloatReader)
}

/// Reader for float-encoded values widened to double.
pub fn floats_as_doubles() -> BoxedReader {
    Box::new(primitives::FloatAsDoubleReader)
}

/// Reader for doubles.
pub fn doubles() -> BoxedReader {
    Box::new(primitives::DoubleReader)
}

/// Reader for strings.
pub fn strings() -> BoxedReader {
    Box::new(primitives::StringReader::new())
}

/// Reader for variable-length byte arrays.
pub fn bytes() -> BoxedReader {
    Box::new(primitives::BytesReader)
}

/// Reader for fixed-length byte arrays of `length` bytes.
pub fn fixed(length: usize) -> BoxedReader {
    Box::new(primitives::FixedReader::new(length))
}

/// Reader for enums over the writer's symbol table.
pub fn enums(symbols: Vec<String>) -> BoxedReader {
    Box::new(primitives::EnumReader::new(symbols))
}

/// Reader for UUIDs stored as 16 big-endian bytes.
pub fn uuids() -> BoxedReader {
    Box::new(logical::UuidReader::new())
}

/// Reader for decimals: an unscaled-bytes reader plus a fixed scale.
pub fn decimal(unscaled_reader: BoxedReader, scale: u32) -> BoxedReader {
    Box::new(logical::DecimalReader::new(unscaled_reader, scale))
}

/// Unscaled-bytes reader for a decimal's physical type.
///
/// Only fixed and bytes encodings carry decimals; anything else fails with
/// [`PlanError::InvalidDecimalEncoding`].
pub fn decimal_bytes_reader(schema: &AvroSchema) -> Result<BoxedReader, PlanError> {
    match schema {
        AvroSchema::Fixed(fixed_schema) => Ok(fixed(fixed_schema.size)),
        AvroSchema::Bytes => Ok(bytes()),
        other => Err(PlanError::InvalidDecimalEncoding(
            other.type_name().to_string(),
        )),
    }
}

/// Reader for variants (metadata and value buffers).
pub fn variants() -> BoxedReader {
    Box::new(logical::VariantReader)
}

/// Reader for unions, one branch reader per variant.
pub fn union(branches: Vec<BoxedReader>) -> BoxedReader {
    Box::new(containers::UnionReader::new(branches))
}

/// Reader for arrays.
pub fn list(element: BoxedReader) -> BoxedReader {
    Box::new(containers::ListReader::new(element))
}

/// Reader for string-keyed maps with Avro map framing.
pub fn map(key: BoxedReader, value: BoxedReader) -> BoxedReader {
    Box::new(containers::MapReader::new(key, value))
}

/// Reader for maps encoded as an array of key/value pairs.
pub fn array_map(key: BoxedReader, value: BoxedReader) -> BoxedReader {
    Box::new(containers::ArrayMapReader::new(key, value))
}

/// Reader returning a fixed value without touching the decoder.
pub fn constant(value: Value) -> BoxedReader {
    Box::new(constants::ConstantReader::new(value))
}

/// Reader that consumes a physical field and returns `value` instead.
pub fn replace_with_constant(replaced: BoxedReader, value: Value) -> BoxedReader {
    Box::new(constants::ReplaceWithConstantReader::new(replaced, value))
}

/// Reader synthesizing the row position.
pub fn positions() -> BoxedReader {
    Box::new(position::PositionReader::new())
}

/// Row-id reader over the file's id field.
///
/// Requires a known `first_row_id` for the null-id fallback; without one the
/// position reads a constant null.
pub fn row_ids(first_row_id: Option<i64>, id_reader: BoxedReader) -> BoxedReader {
    match first_row_id {
        Some(first_row_id) => Box::new(position::RowIdReader::new(first_row_id, id_reader)),
        None => constant(Value::Null),
    }
}

/// Last-updated sequence number reader over the file's sequence field.
///
/// Requires both a known `first_row_id` and `file_seq_number`; otherwise the
/// position reads a constant null.
pub fn last_updated(
    first_row_id: Option<i64>,
    file_seq_number: Option<i64>,
    seq_reader: BoxedReader,
) -> BoxedReader {
    match (first_row_id, file_seq_number) {
        (Some(_), Some(file_seq_number)) => Box::new(position::LastUpdatedSeqReader::new(
            file_seq_number,
            seq_reader,
        )),
        _ => constant(Value::Null),
    }
}

/// Reader that consumes an unprojected record.
pub fn skip_struct(readers: Vec<BoxedReader>) -> BoxedReader {
    Box::new(SkipStructReader::new(readers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FixedSchema;

    #[test]
    fn test_decimal_bytes_reader_accepts_fixed_and_bytes() {
        assert!(decimal_bytes_reader(&AvroSchema::Bytes).is_ok());
        assert!(decimal_bytes_reader(&AvroSchema::Fixed(FixedSchema::new("d", 8))).is_ok());
    }

    #[test]
    fn test_decimal_bytes_reader_rejects_other_types() {
        let err = decimal_bytes_reader(&AvroSchema::Long).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDecimalEncoding(_)));
    }

    #[test]
    fn test_row_ids_gating() {
        use crate::decoder::BinaryDecoder;

        // without a base row id the reader degrades to constant null
        let mut gated = row_ids(None, longs());
        let mut dec = BinaryDecoder::new(&[]);
        assert_eq!(gated.read(&mut dec, None).unwrap(), Value::Null);
    }

    #[test]
    fn test_last_updated_gating_requires_both() {
        use crate::decoder::BinaryDecoder;

        let mut gated = last_updated(None, Some(3), longs());
        let mut dec = BinaryDecoder::new(&[]);
        assert_eq!(gated.read(&mut dec, None).unwrap(), Value::Null);

        let mut gated = last_updated(Some(0), None, longs());
        let mut dec = BinaryDecoder::new(&[]);
        assert_eq!(gated.read(&mut dec, None).unwrap(), Value::Null);
    }
}
