//! Schema types for both sides of a read.
//!
//! The *expected* schema ([`StructType`]) is the logical shape the caller
//! wants; the *writer* schema ([`AvroSchema`]) is what the file physically
//! contains. The two are reconciled by field id in the read planner.

mod avro;
mod parser;
mod types;

pub use avro::{
    AvroSchema, EnumSchema, FieldSchema, FixedSchema, LogicalAnnotation, LogicalSchema,
    RecordSchema,
};
pub use parser::parse_schema;
pub use types::{
    FieldType, NestedField, StructType, IS_DELETED_FIELD_ID,
    LAST_UPDATED_SEQUENCE_NUMBER_FIELD_ID, ROW_ID_FIELD_ID, ROW_POSITION_FIELD_ID,
};
