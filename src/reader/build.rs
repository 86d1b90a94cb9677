//! Reader-tree composition.
//!
//! Walks a writer record schema against an expected struct and builds the
//! per-field readers the read planner consumes, recursing through unions,
//! containers, and nested records. Promotions are decided here: an
//! int-encoded field expected as long gets the widening reader, and so on.

use std::collections::HashMap;

use tracing::debug;

use crate::error::PlanError;
use crate::reader::plan::build_read_plan;
use crate::reader::structs::PlannedStructReader;
use crate::reader::{self, BoxedReader};
use crate::schema::{AvroSchema, FieldType, LogicalAnnotation, RecordSchema, StructType};
use crate::value::Value;

/// Build the planned reader for a whole record.
///
/// # Arguments
/// * `expected` - the struct the caller wants rows shaped as
/// * `writer` - the record schema found in the file
/// * `constants` - externally supplied values by field id
pub fn planned_reader_for(
    expected: &StructType,
    writer: &RecordSchema,
    constants: &HashMap<i32, Value>,
) -> Result<PlannedStructReader, PlanError> {
    let mut field_readers = Vec::with_capacity(writer.fields.len());
    for field in &writer.fields {
        let expected_type = field
            .field_id
            .and_then(|id| expected.field(id))
            .map(|f| &f.field_type);
        field_readers.push(field_reader_for(&field.schema, expected_type, constants)?);
    }

    debug!(
        record = writer.name.as_str(),
        file_fields = writer.fields.len(),
        projected = expected.len(),
        "composing planned reader"
    );

    let plan = build_read_plan(expected, writer, field_readers, constants)?;
    Ok(PlannedStructReader::new(plan, expected.len()))
}

/// Build the reader for one writer schema node.
///
/// `expected` is absent when the field is not projected; the resulting
/// reader then only needs to consume the physical shape.
fn field_reader_for(
    writer: &AvroSchema,
    expected: Option<&FieldType>,
    constants: &HashMap<i32, Value>,
) -> Result<BoxedReader, PlanError> {
    match writer {
        AvroSchema::Null => Ok(reader::nulls()),

        AvroSchema::Boolean => match expected {
            None | Some(FieldType::Boolean) => Ok(reader::booleans()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Int => match expected {
            None | Some(FieldType::Int) => Ok(reader::ints()),
            Some(FieldType::Long) => Ok(reader::ints_as_longs()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Long => match expected {
            None | Some(FieldType::Long) => Ok(reader::longs()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Float => match expected {
            None | Some(FieldType::Float) => Ok(reader::floats()),
            Some(FieldType::Double) => Ok(reader::floats_as_doubles()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Double => match expected {
            None | Some(FieldType::Double) => Ok(reader::doubles()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::String => match expected {
            None | Some(FieldType::String) => Ok(reader::strings()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Bytes => match expected {
            None | Some(FieldType::Binary) => Ok(reader::bytes()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Fixed(fixed_schema) => match expected {
            None => Ok(reader::fixed(fixed_schema.size)),
            Some(FieldType::Fixed(len)) if *len == fixed_schema.size => {
                Ok(reader::fixed(fixed_schema.size))
            }
            Some(FieldType::Uuid) if fixed_schema.size == 16 => Ok(reader::uuids()),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Enum(enum_schema) => match expected {
            None | Some(FieldType::String) => Ok(reader::enums(enum_schema.symbols.clone())),
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Logical(logical) => match &logical.annotation {
            LogicalAnnotation::Uuid => match expected {
                None | Some(FieldType::Uuid) => Ok(reader::uuids()),
                Some(other) => Err(mismatch(writer, other)),
            },
            LogicalAnnotation::Decimal { scale, .. } => match expected {
                None => Ok(reader::decimal(
                    reader::decimal_bytes_reader(&logical.base)?,
                    *scale,
                )),
                Some(FieldType::Decimal {
                    scale: expected_scale,
                    ..
                }) if expected_scale == scale => Ok(reader::decimal(
                    reader::decimal_bytes_reader(&logical.base)?,
                    *scale,
                )),
                Some(other) => Err(mismatch(writer, other)),
            },
        },

        AvroSchema::Union(variants) => {
            let branches = variants
                .iter()
                .map(|variant| field_reader_for(variant, expected, constants))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reader::union(branches))
        }

        AvroSchema::Array(element) => match expected {
            None => Ok(reader::list(field_reader_for(element, None, constants)?)),
            Some(FieldType::List(element_type)) => Ok(reader::list(field_reader_for(
                element,
                Some(element_type),
                constants,
            )?)),
            // A logical map with non-string keys is written as an array of
            // two-field key/value records
            Some(FieldType::Map { key, value }) => match element.as_ref() {
                AvroSchema::Record(kv) if kv.fields.len() == 2 => {
                    let key_reader =
                        field_reader_for(&kv.fields[0].schema, Some(key), constants)?;
                    let value_reader =
                        field_reader_for(&kv.fields[1].schema, Some(value), constants)?;
                    Ok(reader::array_map(key_reader, value_reader))
                }
                _ => Err(PlanError::IncompatibleTypes {
                    writer: writer.type_name().to_string(),
                    expected: format!("map<{}, {}>", key, value),
                }),
            },
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Map(value_schema) => match expected {
            None => Ok(reader::map(
                reader::strings(),
                field_reader_for(value_schema, None, constants)?,
            )),
            Some(FieldType::Map { key, value }) if **key == FieldType::String => {
                Ok(reader::map(
                    reader::strings(),
                    field_reader_for(value_schema, Some(value), constants)?,
                ))
            }
            Some(other) => Err(mismatch(writer, other)),
        },

        AvroSchema::Record(nested) => match expected {
            // Unprojected struct: consume it without materializing anything
            None => {
                let skippers = nested
                    .fields
                    .iter()
                    .map(|field| field_reader_for(&field.schema, None, constants))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(reader::skip_struct(skippers))
            }
            Some(FieldType::Struct(nested_expected)) => Ok(Box::new(planned_reader_for(
                nested_expected,
                nested,
                constants,
            )?)),
            // A variant is physically a record of two byte buffers
            Some(FieldType::Variant) if is_variant_record(nested) => Ok(reader::variants()),
            Some(other) => Err(mismatch(writer, other)),
        },
    }
}

/// True for the two-buffer record shape that carries a variant.
fn is_variant_record(record: &RecordSchema) -> bool {
    record.fields.len() == 2
        && record
            .fields
            .iter()
            .all(|field| matches!(field.schema, AvroSchema::Bytes))
}

fn mismatch(writer: &AvroSchema, expected: &FieldType) -> PlanError {
    PlanError::IncompatibleTypes {
        writer: writer.type_name().to_string(),
        expected: expected.to_string(),
    }
}
