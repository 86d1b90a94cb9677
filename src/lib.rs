//! Projection-aware Avro value decoding for table-format readers.
//!
//! This library decodes binary Avro byte streams into in-memory rows shaped
//! by an *expected* schema rather than the physical schema of the file. The
//! two are reconciled by stable field ids: fields can be projected away,
//! supplied from outside the file as constants (partition values, metadata
//! columns), synthesized (row position, row ids), or filled from initial
//! defaults when the file predates them.
//!
//! The container format, compression, and file-level reading are external
//! concerns; this crate consumes a byte-oriented [`decoder::Decoder`] and
//! produces [`value::Value`] rows through a tree of
//! [`reader::ValueReader`]s.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use floe::decoder::{encode_zigzag, BinaryDecoder};
//! use floe::reader::{planned_reader_for, ValueReader};
//! use floe::schema::{parse_schema, AvroSchema, FieldType, NestedField, StructType};
//! use floe::value::Value;
//!
//! let writer = match parse_schema(
//!     r#"{"type": "record", "name": "row",
//!         "fields": [{"name": "id", "type": "int", "field-id": 1}]}"#,
//! )
//! .unwrap()
//! {
//!     AvroSchema::Record(record) => record,
//!     _ => unreachable!(),
//! };
//! let expected = StructType::new(vec![NestedField::required(1, "id", FieldType::Long)]);
//!
//! let mut reader = planned_reader_for(&expected, &writer, &HashMap::new()).unwrap();
//! let data = encode_zigzag(7);
//! let mut decoder = BinaryDecoder::new(&data);
//! match reader.read(&mut decoder, None).unwrap() {
//!     Value::Struct(row) => assert_eq!(row.get(0), &Value::Long(7)),
//!     _ => unreachable!(),
//! }
//! ```

pub mod decoder;
pub mod error;
pub mod reader;
pub mod schema;
pub mod value;

// Re-export main types
pub use decoder::{BinaryDecoder, Decoder};
pub use error::{DecodeError, PlanError};
pub use reader::{
    build_read_plan, build_read_plan_with, planned_reader_for, BoxedReader, PlannedStructReader,
    ReadPlan, SkipStructReader, StructReader, ValueReader,
};
pub use schema::{
    parse_schema, AvroSchema, FieldSchema, FieldType, NestedField, RecordSchema, StructType,
};
pub use value::{Record, RecordFactory, Value};
