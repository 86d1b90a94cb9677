//! Struct readers: decode records field by field into positional rows.
//!
//! Two flavors exist. [`StructReader`] pairs one reader per expected field
//! and reads in physical order, overwriting externally supplied constants
//! after the row is materialized. [`PlannedStructReader`] is driven by a
//! read plan and needs no field ids at decode time; resolution happened in
//! the planner. [`SkipStructReader`] consumes a record that is not
//! projected at all.

use std::collections::HashMap;

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::reader::plan::ReadPlan;
use crate::reader::position::PositionReader;
use crate::reader::{BoxedReader, ValueReader};
use crate::schema::{StructType, IS_DELETED_FIELD_ID, ROW_POSITION_FIELD_ID};
use crate::value::{Record, RecordFactory, Value};

fn default_factory(field_count: usize) -> RecordFactory {
    Box::new(move || Record::new(field_count))
}

/// Reuse the carried row when its arity matches, otherwise build a fresh one.
fn reuse_or_create(reuse: Option<Value>, field_count: usize, factory: &RecordFactory) -> Record {
    match reuse {
        Some(Value::Struct(row)) if row.len() == field_count => row,
        _ => factory(),
    }
}

/// Move the previous value out of a slot as a reuse hint.
#[inline]
fn slot_hint(row: &mut Record, pos: usize) -> Option<Value> {
    match row.take(pos) {
        Value::Null => None,
        value => Some(value),
    }
}

/// Reads a record with one reader per expected field, in physical order.
///
/// Constant positions (externally supplied values plus the synthesized
/// `is_deleted = false`) are overwritten after every decoded field has been
/// stored, so a constant always wins over a physical value. The slot of the
/// row-position field, when present, is tracked so supplier injection can
/// swap that reader for a [`PositionReader`].
pub struct StructReader {
    readers: Vec<BoxedReader>,
    constants: Vec<(usize, Value)>,
    position_slot: Option<usize>,
    field_count: usize,
    factory: RecordFactory,
}

impl StructReader {
    /// Pair `readers` with the fields of `expected`, one per field in order.
    pub fn new(
        readers: Vec<BoxedReader>,
        expected: &StructType,
        constants: &HashMap<i32, Value>,
    ) -> Self {
        let mut constant_slots = Vec::new();
        let mut position_slot = None;
        for (pos, field) in expected.fields.iter().enumerate() {
            if let Some(constant) = constants.get(&field.field_id) {
                constant_slots.push((pos, constant.clone()));
            } else if field.field_id == ROW_POSITION_FIELD_ID {
                position_slot = Some(pos);
            } else if field.field_id == IS_DELETED_FIELD_ID {
                constant_slots.push((pos, Value::Boolean(false)));
            }
        }

        let field_count = expected.len();
        Self {
            readers,
            constants: constant_slots,
            position_slot,
            field_count,
            factory: default_factory(field_count),
        }
    }

    /// Replace the row constructor.
    pub fn with_factory(mut self, factory: RecordFactory) -> Self {
        self.factory = factory;
        self
    }
}

impl ValueReader for StructReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        let mut row = reuse_or_create(reuse, self.field_count, &self.factory);

        for (pos, reader) in self.readers.iter_mut().enumerate() {
            let hint = slot_hint(&mut row, pos);
            let value = reader.read(decoder, hint)?;
            row.set(pos, value);
        }

        // Constants land after decoded fields so they always win
        for (pos, constant) in &self.constants {
            row.set(*pos, constant.clone());
        }

        Ok(Value::Struct(row))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        for reader in &mut self.readers {
            reader.skip(decoder)?;
        }
        Ok(())
    }

    fn set_row_position_supplier(&mut self, supplier: &dyn Fn() -> i64) {
        if let Some(pos) = self.position_slot {
            self.readers[pos] = Box::new(PositionReader::new());
        }

        for reader in &mut self.readers {
            reader.set_row_position_supplier(supplier);
        }
    }
}

/// Reads a record by executing a read plan.
///
/// Each plan entry is `(projection position, reader)`. A present position
/// stores the decoded value at that slot, handing the slot's previous value
/// to the reader as reuse; an absent position means the field exists in the
/// file but is not projected, so the reader only advances the stream.
pub struct PlannedStructReader {
    readers: Vec<BoxedReader>,
    positions: Vec<Option<usize>>,
    field_count: usize,
    factory: RecordFactory,
}

impl std::fmt::Debug for PlannedStructReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedStructReader")
            .field("positions", &self.positions)
            .field("field_count", &self.field_count)
            .finish()
    }
}

impl PlannedStructReader {
    /// Build from a read plan for an expected struct of `field_count` fields.
    pub fn new(plan: ReadPlan, field_count: usize) -> Self {
        let (positions, readers): (Vec<Option<usize>>, Vec<BoxedReader>) =
            plan.into_iter().unzip();
        Self {
            readers,
            positions,
            field_count,
            factory: default_factory(field_count),
        }
    }

    /// Replace the row constructor.
    pub fn with_factory(mut self, factory: RecordFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Number of fields in the produced rows.
    pub fn field_count(&self) -> usize {
        self.field_count
    }
}

impl ValueReader for PlannedStructReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        let mut row = reuse_or_create(reuse, self.field_count, &self.factory);

        for (reader, position) in self.readers.iter_mut().zip(&self.positions) {
            match position {
                Some(pos) => {
                    let hint = slot_hint(&mut row, *pos);
                    let value = reader.read(decoder, hint)?;
                    row.set(*pos, value);
                }
                None => reader.skip(decoder)?,
            }
        }

        Ok(Value::Struct(row))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        for reader in &mut self.readers {
            reader.skip(decoder)?;
        }
        Ok(())
    }

    fn set_row_position_supplier(&mut self, supplier: &dyn Fn() -> i64) {
        for reader in &mut self.readers {
            reader.set_row_position_supplier(supplier);
        }
    }
}

/// Consumes a record without projecting any field.
///
/// Keeps the byte stream aligned when an entire nested struct is dropped
/// from the projection.
pub struct SkipStructReader {
    readers: Vec<BoxedReader>,
}

impl SkipStructReader {
    /// One reader per physical field, in write order.
    pub fn new(readers: Vec<BoxedReader>) -> Self {
        Self { readers }
    }
}

impl ValueReader for SkipStructReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        self.skip(decoder)?;
        Ok(Value::Null)
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        for reader in &mut self.readers {
            reader.skip(decoder)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{encode_zigzag, BinaryDecoder};
    use crate::reader;
    use crate::schema::{FieldType, NestedField};

    fn two_field_expected() -> StructType {
        StructType::new(vec![
            NestedField::required(1, "a", FieldType::Long),
            NestedField::optional(2, "b", FieldType::String),
        ])
    }

    fn encode_row(a: i64, b: &str) -> Vec<u8> {
        let mut data = encode_zigzag(a);
        data.extend(encode_zigzag(b.len() as i64));
        data.extend(b.as_bytes());
        data
    }

    #[test]
    fn test_struct_reader_physical_order() {
        let data = encode_row(7, "x");
        let mut dec = BinaryDecoder::new(&data);

        let mut reader = StructReader::new(
            vec![reader::longs(), reader::strings()],
            &two_field_expected(),
            &HashMap::new(),
        );
        match reader.read(&mut dec, None).unwrap() {
            Value::Struct(row) => {
                assert_eq!(row.get(0), &Value::Long(7));
                assert_eq!(row.get(1), &Value::String("x".to_string()));
            }
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_reader_constant_wins() {
        let data = encode_row(7, "file value");
        let mut dec = BinaryDecoder::new(&data);

        let constants = HashMap::from([(2, Value::String("constant".to_string()))]);
        let mut reader = StructReader::new(
            vec![reader::longs(), reader::strings()],
            &two_field_expected(),
            &constants,
        );
        match reader.read(&mut dec, None).unwrap() {
            Value::Struct(row) => {
                assert_eq!(row.get(1), &Value::String("constant".to_string()));
            }
            other => panic!("expected struct, got {:?}", other),
        }
        // the physical value was still consumed
        assert!(dec.is_empty());
    }

    #[test]
    fn test_struct_reader_is_deleted_synthesized() {
        let expected = StructType::new(vec![
            NestedField::required(1, "a", FieldType::Long),
            NestedField::required(IS_DELETED_FIELD_ID, "_deleted", FieldType::Boolean),
        ]);
        // _deleted reads true from the file but the synthesized false wins
        let mut data = encode_zigzag(5);
        data.push(0x01);
        let mut dec = BinaryDecoder::new(&data);

        let mut reader = StructReader::new(
            vec![reader::longs(), reader::booleans()],
            &expected,
            &HashMap::new(),
        );
        match reader.read(&mut dec, None).unwrap() {
            Value::Struct(row) => assert_eq!(row.get(1), &Value::Boolean(false)),
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_reader_position_slot_hot_swap() {
        let expected = StructType::new(vec![
            NestedField::required(1, "a", FieldType::Long),
            NestedField::required(ROW_POSITION_FIELD_ID, "_pos", FieldType::Long),
        ]);
        // before injection the slot reads the physical long; after, it counts
        let mut reader = StructReader::new(
            vec![reader::longs(), reader::longs()],
            &expected,
            &HashMap::new(),
        );
        reader.set_row_position_supplier(&|| 10);

        // only field "a" remains physical
        let data = encode_zigzag(5);
        let mut dec = BinaryDecoder::new(&data);
        match reader.read(&mut dec, None).unwrap() {
            Value::Struct(row) => {
                assert_eq!(row.get(0), &Value::Long(5));
                assert_eq!(row.get(1), &Value::Long(10));
            }
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_planned_struct_reader_skips_unprojected() {
        // file: a=7, b="x"; plan projects only a into slot 0
        let data = encode_row(7, "x");
        let mut dec = BinaryDecoder::new(&data);

        let plan: ReadPlan = vec![(Some(0), reader::longs()), (None, reader::strings())];
        let mut reader = PlannedStructReader::new(plan, 1);
        match reader.read(&mut dec, None).unwrap() {
            Value::Struct(row) => {
                assert_eq!(row.len(), 1);
                assert_eq!(row.get(0), &Value::Long(7));
            }
            other => panic!("expected struct, got {:?}", other),
        }
        assert!(dec.is_empty());
    }

    #[test]
    fn test_planned_struct_reader_reuses_row() {
        let plan: ReadPlan = vec![(Some(0), reader::longs())];
        let mut reader = PlannedStructReader::new(plan, 1);

        let data = encode_zigzag(1);
        let mut dec = BinaryDecoder::new(&data);
        let first = reader.read(&mut dec, None).unwrap();

        let data = encode_zigzag(2);
        let mut dec = BinaryDecoder::new(&data);
        let second = reader.read(&mut dec, Some(first)).unwrap();
        match second {
            Value::Struct(row) => assert_eq!(row.get(0), &Value::Long(2)),
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_struct_reader_consumes_all_fields() {
        let mut data = encode_row(7, "abc");
        data.extend(encode_zigzag(42));
        let mut dec = BinaryDecoder::new(&data);

        let mut skipper = SkipStructReader::new(vec![reader::longs(), reader::strings()]);
        assert_eq!(skipper.read(&mut dec, None).unwrap(), Value::Null);
        assert_eq!(dec.read_long().unwrap(), 42);
    }
}
