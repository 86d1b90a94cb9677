//! JSON schema parser for writer Avro schemas.
//!
//! Parses the schema JSON recorded in a data file into the [`AvroSchema`]
//! type hierarchy, including the `field-id` field property the read planner
//! matches on. Logical annotations other than `uuid` and `decimal` are
//! dropped and the base type is kept.

use serde_json::Value;

use crate::error::PlanError;
use crate::schema::{
    AvroSchema, EnumSchema, FieldSchema, FixedSchema, LogicalAnnotation, LogicalSchema,
    RecordSchema,
};

/// Parse a writer Avro schema from a JSON string.
///
/// # Example
/// ```
/// use floe::schema::parse_schema;
///
/// let schema = parse_schema(r#""string""#).unwrap();
/// ```
pub fn parse_schema(json: &str) -> Result<AvroSchema, PlanError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| PlanError::InvalidSchema(format!("Invalid JSON: {}", e)))?;
    parse_value(&value)
}

/// Parse a JSON value into an AvroSchema.
fn parse_value(value: &Value) -> Result<AvroSchema, PlanError> {
    match value {
        Value::String(s) => parse_primitive(s),
        Value::Object(obj) => parse_object(obj),
        Value::Array(arr) => parse_union(arr),
        _ => Err(PlanError::InvalidSchema(format!(
            "Expected string, object, or array, found: {:?}",
            value
        ))),
    }
}

fn parse_union(arr: &[Value]) -> Result<AvroSchema, PlanError> {
    let variants = arr
        .iter()
        .map(parse_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AvroSchema::Union(variants))
}

fn parse_primitive(s: &str) -> Result<AvroSchema, PlanError> {
    match s {
        "null" => Ok(AvroSchema::Null),
        "boolean" => Ok(AvroSchema::Boolean),
        "int" => Ok(AvroSchema::Int),
        "long" => Ok(AvroSchema::Long),
        "float" => Ok(AvroSchema::Float),
        "double" => Ok(AvroSchema::Double),
        "bytes" => Ok(AvroSchema::Bytes),
        "string" => Ok(AvroSchema::String),
        other => Err(PlanError::InvalidSchema(format!(
            "Unknown or unresolved type: {}",
            other
        ))),
    }
}

fn parse_object(obj: &serde_json::Map<String, Value>) -> Result<AvroSchema, PlanError> {
    let type_str = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PlanError::InvalidSchema("Missing 'type' field".to_string()))?;

    let base = match type_str {
        "null" => AvroSchema::Null,
        "boolean" => AvroSchema::Boolean,
        "int" => AvroSchema::Int,
        "long" => AvroSchema::Long,
        "float" => AvroSchema::Float,
        "double" => AvroSchema::Double,
        "bytes" => AvroSchema::Bytes,
        "string" => AvroSchema::String,
        "record" => parse_record(obj)?,
        "enum" => parse_enum(obj)?,
        "array" => {
            let items = obj.get("items").ok_or_else(|| {
                PlanError::InvalidSchema("Array missing 'items' field".to_string())
            })?;
            AvroSchema::Array(Box::new(parse_value(items)?))
        }
        "map" => {
            let values = obj.get("values").ok_or_else(|| {
                PlanError::InvalidSchema("Map missing 'values' field".to_string())
            })?;
            AvroSchema::Map(Box::new(parse_value(values)?))
        }
        "fixed" => parse_fixed(obj)?,
        other => {
            return Err(PlanError::InvalidSchema(format!(
                "Unknown type: {}",
                other
            )))
        }
    };

    wrap_logical(obj, base)
}

/// Wrap the base type in a logical annotation when one the core interprets
/// is present. Unknown annotations fall through to the base type.
fn wrap_logical(
    obj: &serde_json::Map<String, Value>,
    base: AvroSchema,
) -> Result<AvroSchema, PlanError> {
    let logical = match obj.get("logicalType").and_then(|v| v.as_str()) {
        Some(l) => l,
        None => return Ok(base),
    };

    match logical {
        "uuid" => Ok(AvroSchema::Logical(LogicalSchema::new(
            base,
            LogicalAnnotation::Uuid,
        ))),
        "decimal" => {
            let precision = obj
                .get("precision")
                .and_then(|v| v.as_u64())
                .ok_or_else(|| {
                    PlanError::InvalidSchema("Decimal missing 'precision' field".to_string())
                })? as u32;
            let scale = obj.get("scale").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            match base {
                AvroSchema::Bytes | AvroSchema::Fixed(_) => {
                    Ok(AvroSchema::Logical(LogicalSchema::new(
                        base,
                        LogicalAnnotation::Decimal { precision, scale },
                    )))
                }
                other => Err(PlanError::InvalidDecimalEncoding(
                    other.type_name().to_string(),
                )),
            }
        }
        _ => Ok(base),
    }
}

fn parse_record(obj: &serde_json::Map<String, Value>) -> Result<AvroSchema, PlanError> {
    let name = obj
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PlanError::InvalidSchema("Record missing 'name' field".to_string()))?
        .to_string();

    let fields_json = obj
        .get("fields")
        .and_then(|v| v.as_array())
        .ok_or_else(|| PlanError::InvalidSchema("Record missing 'fields' array".to_string()))?;

    let mut fields = Vec::with_capacity(fields_json.len());
    for field_json in fields_json {
        let field_obj = field_json.as_object().ok_or_else(|| {
            PlanError::InvalidSchema("Record field must be an object".to_string())
        })?;

        let field_name = field_obj
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PlanError::InvalidSchema("Field missing 'name'".to_string()))?
            .to_string();

        let field_type = field_obj
            .get("type")
            .ok_or_else(|| PlanError::InvalidSchema(format!("Field '{}' missing 'type'", field_name)))?;

        let mut field = FieldSchema::new(field_name, parse_value(field_type)?);
        if let Some(id) = field_obj.get("field-id").and_then(|v| v.as_i64()) {
            field = field.with_field_id(id as i32);
        }
        fields.push(field);
    }

    Ok(AvroSchema::Record(RecordSchema::new(name, fields)))
}

fn parse_enum(obj: &serde_json::Map<String, Value>) -> Result<AvroSchema, PlanError> {
    let name = obj
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PlanError::InvalidSchema("Enum missing 'name' field".to_string()))?
        .to_string();

    let symbols = obj
        .get("symbols")
        .and_then(|v| v.as_array())
        .ok_or_else(|| PlanError::InvalidSchema("Enum missing 'symbols' array".to_string()))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| PlanError::InvalidSchema("Enum symbol must be a string".to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AvroSchema::Enum(EnumSchema::new(name, symbols)))
}

fn parse_fixed(obj: &serde_json::Map<String, Value>) -> Result<AvroSchema, PlanError> {
    let name = obj
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PlanError::InvalidSchema("Fixed missing 'name' field".to_string()))?
        .to_string();

    let size = obj
        .get("size")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| PlanError::InvalidSchema("Fixed missing 'size' field".to_string()))?
        as usize;

    Ok(AvroSchema::Fixed(FixedSchema::new(name, size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse_schema(r#""null""#).unwrap(), AvroSchema::Null);
        assert_eq!(parse_schema(r#""int""#).unwrap(), AvroSchema::Int);
        assert_eq!(parse_schema(r#""string""#).unwrap(), AvroSchema::String);
    }

    #[test]
    fn test_parse_record_with_field_ids() {
        let json = r#"{
            "type": "record",
            "name": "row",
            "fields": [
                {"name": "id", "type": "long", "field-id": 1},
                {"name": "name", "type": ["null", "string"], "field-id": 2}
            ]
        }"#;

        let schema = parse_schema(json).unwrap();
        let record = match schema {
            AvroSchema::Record(r) => r,
            other => panic!("expected record, got {:?}", other),
        };
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[0].field_id, Some(1));
        assert_eq!(record.fields[1].field_id, Some(2));
        assert!(record.fields[1].schema.is_nullable());
    }

    #[test]
    fn test_parse_decimal_fixed() {
        let json = r#"{
            "type": "fixed",
            "name": "dec_9_2",
            "size": 4,
            "logicalType": "decimal",
            "precision": 9,
            "scale": 2
        }"#;

        match parse_schema(json).unwrap() {
            AvroSchema::Logical(logical) => {
                assert_eq!(
                    logical.annotation,
                    LogicalAnnotation::Decimal {
                        precision: 9,
                        scale: 2
                    }
                );
                assert!(matches!(*logical.base, AvroSchema::Fixed(_)));
            }
            other => panic!("expected logical, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_decimal_rejects_int_base() {
        let json = r#"{"type": "int", "logicalType": "decimal", "precision": 9}"#;
        assert!(matches!(
            parse_schema(json),
            Err(PlanError::InvalidDecimalEncoding(_))
        ));
    }

    #[test]
    fn test_unknown_logical_type_falls_back_to_base() {
        let json = r#"{"type": "long", "logicalType": "timestamp-micros"}"#;
        assert_eq!(parse_schema(json).unwrap(), AvroSchema::Long);
    }

    #[test]
    fn test_parse_enum() {
        let json = r#"{"type": "enum", "name": "color", "symbols": ["RED", "GREEN"]}"#;
        match parse_schema(json).unwrap() {
            AvroSchema::Enum(e) => assert_eq!(e.symbols, vec!["RED", "GREEN"]),
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_schema("{not json"),
            Err(PlanError::InvalidSchema(_))
        ));
    }
}
