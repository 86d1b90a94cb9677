//! Read-plan construction.
//!
//! A read plan reconciles a writer record schema against an expected struct
//! once, at build time, so the planned struct reader never consults field
//! ids while decoding. Every physical field lands in the plan (projected or
//! not, to keep the byte stream aligned); expected fields missing from the
//! file get synthesizing readers appended after them.

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::PlanError;
use crate::reader::logical::unscaled_from_be_bytes;
use crate::reader::{self, BoxedReader};
use crate::schema::{
    FieldType, NestedField, RecordSchema, StructType, IS_DELETED_FIELD_ID,
    LAST_UPDATED_SEQUENCE_NUMBER_FIELD_ID, ROW_ID_FIELD_ID, ROW_POSITION_FIELD_ID,
};
use crate::value::Value;

/// Ordered `(projection position, reader)` pairs for one expected struct.
///
/// `None` marks a field that is present in the file but not projected: its
/// reader is invoked to advance the decoder and the result is discarded.
pub type ReadPlan = Vec<(Option<usize>, BoxedReader)>;

/// Converts a raw initial default into a materialized value.
pub type DefaultConverter = dyn Fn(&FieldType, &JsonValue) -> Result<Value, PlanError>;

/// Build a read plan using the built-in default materializer.
///
/// # Arguments
/// * `expected` - the struct the caller wants rows shaped as
/// * `record` - the writer record schema from the file
/// * `field_readers` - one reader per writer field, in write order
/// * `constants` - externally supplied values by field id
pub fn build_read_plan(
    expected: &StructType,
    record: &RecordSchema,
    field_readers: Vec<BoxedReader>,
    constants: &HashMap<i32, Value>,
) -> Result<ReadPlan, PlanError> {
    build_read_plan_with(expected, record, field_readers, constants, &materialize_default)
}

/// Build a read plan with a caller-supplied default materializer.
pub fn build_read_plan_with(
    expected: &StructType,
    record: &RecordSchema,
    field_readers: Vec<BoxedReader>,
    constants: &HashMap<i32, Value>,
    convert: &DefaultConverter,
) -> Result<ReadPlan, PlanError> {
    if record.fields.len() != field_readers.len() {
        return Err(PlanError::InvalidSchema(format!(
            "Record '{}' has {} fields but {} readers were supplied",
            record.name,
            record.fields.len(),
            field_readers.len()
        )));
    }

    let mut id_to_pos: HashMap<i32, usize> = expected
        .fields
        .iter()
        .enumerate()
        .map(|(pos, field)| (field.field_id, pos))
        .collect();

    let mut plan: ReadPlan = Vec::with_capacity(record.fields.len() + expected.len());

    // Every writer field must be consumed to keep the stream aligned
    for (field, field_reader) in record.fields.iter().zip(field_readers) {
        let projection = field.field_id.and_then(|id| id_to_pos.remove(&id));
        plan.push(file_field_entry(
            field.field_id,
            projection,
            field_reader,
            constants,
        ));
    }

    let consumed = plan.len();

    // Expected fields not found in the file get synthesizing readers
    for (pos, field) in expected.fields.iter().enumerate() {
        if !id_to_pos.contains_key(&field.field_id) {
            continue;
        }
        plan.push((Some(pos), missing_field_reader(field, constants, convert)?));
    }

    debug!(
        record = record.name.as_str(),
        file_fields = consumed,
        synthesized = plan.len() - consumed,
        "built read plan"
    );

    Ok(plan)
}

/// Plan entry for a field that is physically present in the file.
fn file_field_entry(
    field_id: Option<i32>,
    projection: Option<usize>,
    field_reader: BoxedReader,
    constants: &HashMap<i32, Value>,
) -> (Option<usize>, BoxedReader) {
    match field_id {
        Some(id) if id == ROW_ID_FIELD_ID => {
            let first_row_id = constants.get(&id).and_then(Value::as_long);
            (projection, reader::row_ids(first_row_id, field_reader))
        }
        Some(id) if id == LAST_UPDATED_SEQUENCE_NUMBER_FIELD_ID => {
            let first_row_id = constants.get(&ROW_ID_FIELD_ID).and_then(Value::as_long);
            let file_seq_number = constants.get(&id).and_then(Value::as_long);
            (
                projection,
                reader::last_updated(first_row_id, file_seq_number, field_reader),
            )
        }
        Some(id) => match (projection, constants.get(&id)) {
            // The field exists in the file and must be consumed, but the
            // caller's value overrides it
            (Some(pos), Some(constant)) => (
                Some(pos),
                reader::replace_with_constant(field_reader, constant.clone()),
            ),
            (projection, _) => (projection, field_reader),
        },
        // A field with no id can never be projected
        None => (None, field_reader),
    }
}

/// Reader for an expected field with no physical counterpart.
fn missing_field_reader(
    field: &NestedField,
    constants: &HashMap<i32, Value>,
    convert: &DefaultConverter,
) -> Result<BoxedReader, PlanError> {
    if let Some(constant) = constants.get(&field.field_id) {
        Ok(reader::constant(constant.clone()))
    } else if let Some(default) = &field.initial_default {
        Ok(reader::constant(convert(&field.field_type, default)?))
    } else if field.field_id == IS_DELETED_FIELD_ID {
        Ok(reader::constant(Value::Boolean(false)))
    } else if field.field_id == ROW_POSITION_FIELD_ID {
        Ok(reader::positions())
    } else if !field.required {
        Ok(reader::constant(Value::Null))
    } else {
        Err(PlanError::MissingRequiredField(field.name.clone()))
    }
}

/// Materialize a raw JSON default for an expected type.
///
/// Byte-typed defaults follow the Avro JSON convention: a string whose
/// code points are the byte values.
pub fn materialize_default(
    field_type: &FieldType,
    default: &JsonValue,
) -> Result<Value, PlanError> {
    if default.is_null() {
        return Ok(Value::Null);
    }

    let unsupported = || {
        PlanError::InvalidSchema(format!(
            "Cannot materialize default {} for type {}",
            default, field_type
        ))
    };

    match field_type {
        FieldType::Boolean => default.as_bool().map(Value::Boolean).ok_or_else(unsupported),
        FieldType::Int => {
            let v = default.as_i64().ok_or_else(unsupported)?;
            i32::try_from(v).map(Value::Int).map_err(|_| unsupported())
        }
        FieldType::Long => default.as_i64().map(Value::Long).ok_or_else(unsupported),
        FieldType::Float => default
            .as_f64()
            .map(|v| Value::Float(v as f32))
            .ok_or_else(unsupported),
        FieldType::Double => default.as_f64().map(Value::Double).ok_or_else(unsupported),
        FieldType::String => default
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(unsupported),
        FieldType::Binary => json_bytes(default)
            .map(Value::Bytes)
            .ok_or_else(unsupported),
        FieldType::Fixed(len) => match json_bytes(default) {
            Some(bytes) if bytes.len() == *len => Ok(Value::Fixed(bytes)),
            _ => Err(unsupported()),
        },
        FieldType::Uuid => {
            let s = default.as_str().ok_or_else(unsupported)?;
            uuid::Uuid::parse_str(s)
                .map(Value::Uuid)
                .map_err(|_| unsupported())
        }
        FieldType::Decimal { scale, .. } => {
            let bytes = json_bytes(default).ok_or_else(unsupported)?;
            let unscaled = unscaled_from_be_bytes(&bytes).map_err(|_| unsupported())?;
            Ok(Value::Decimal {
                unscaled,
                scale: *scale,
            })
        }
        FieldType::List(element) => {
            let items = default.as_array().ok_or_else(unsupported)?;
            let values = items
                .iter()
                .map(|item| materialize_default(element, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
        FieldType::Map { .. } | FieldType::Struct(_) | FieldType::Variant => Err(unsupported()),
    }
}

/// Bytes from the Avro JSON convention (string of code points 0-255).
fn json_bytes(default: &JsonValue) -> Option<Vec<u8>> {
    let s = default.as_str()?;
    let mut bytes = Vec::with_capacity(s.len());
    for c in s.chars() {
        let code = c as u32;
        if code > 0xFF {
            return None;
        }
        bytes.push(code as u8);
    }
    Some(bytes)
}
