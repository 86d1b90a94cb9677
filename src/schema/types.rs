//! Expected-side schema types.
//!
//! The expected schema is the logical shape the caller wants rows to have.
//! It may differ from the file's writer schema in field presence, order, and
//! type (within Avro's promotion rules). Fields are matched to the writer
//! schema by stable integer field id, never by name.

use serde_json::Value as JsonValue;

/// Field id of the synthesized row-position metadata column.
pub const ROW_POSITION_FIELD_ID: i32 = i32::MAX - 2;
/// Field id of the is-deleted metadata column.
pub const IS_DELETED_FIELD_ID: i32 = i32::MAX - 3;
/// Field id of the row-id metadata column.
pub const ROW_ID_FIELD_ID: i32 = i32::MAX - 6;
/// Field id of the last-updated sequence number metadata column.
pub const LAST_UPDATED_SEQUENCE_NUMBER_FIELD_ID: i32 = i32::MAX - 7;

/// Logical type of an expected field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 floating-point.
    Float,
    /// 64-bit IEEE 754 floating-point.
    Double,
    /// Unicode string.
    String,
    /// Variable-length byte sequence.
    Binary,
    /// Fixed-length byte sequence.
    Fixed(usize),
    /// 128-bit UUID.
    Uuid,
    /// Fixed-point decimal.
    Decimal {
        /// Total number of digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
    /// Ordered sequence of elements.
    List(Box<FieldType>),
    /// Key/value mapping.
    Map {
        /// Key type.
        key: Box<FieldType>,
        /// Value type.
        value: Box<FieldType>,
    },
    /// Nested row.
    Struct(StructType),
    /// Self-describing encoded value.
    Variant,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Int => write!(f, "int"),
            FieldType::Long => write!(f, "long"),
            FieldType::Float => write!(f, "float"),
            FieldType::Double => write!(f, "double"),
            FieldType::String => write!(f, "string"),
            FieldType::Binary => write!(f, "binary"),
            FieldType::Fixed(len) => write!(f, "fixed[{}]", len),
            FieldType::Uuid => write!(f, "uuid"),
            FieldType::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)
            }
            FieldType::List(element) => write!(f, "list<{}>", element),
            FieldType::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            FieldType::Struct(_) => write!(f, "struct"),
            FieldType::Variant => write!(f, "variant"),
        }
    }
}

/// A field of an expected struct.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedField {
    /// Stable integer id; the sole identity used to match writer fields.
    pub field_id: i32,
    /// Field name, used in error messages only.
    pub name: String,
    /// Logical type of the field.
    pub field_type: FieldType,
    /// Whether a value must be present for every row.
    pub required: bool,
    /// Raw default applied when the field is absent from the file.
    pub initial_default: Option<JsonValue>,
}

impl NestedField {
    /// Create a required field.
    pub fn required(field_id: i32, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_id,
            name: name.into(),
            field_type,
            required: true,
            initial_default: None,
        }
    }

    /// Create an optional field.
    pub fn optional(field_id: i32, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_id,
            name: name.into(),
            field_type,
            required: false,
            initial_default: None,
        }
    }

    /// Set the initial default, used when the field is missing from a file
    /// written before the field existed.
    pub fn with_initial_default(mut self, default: JsonValue) -> Self {
        self.initial_default = Some(default);
        self
    }
}

/// An ordered list of expected fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    /// Fields in projection order.
    pub fields: Vec<NestedField>,
}

impl StructType {
    /// Create a struct type from fields in projection order.
    pub fn new(fields: Vec<NestedField>) -> Self {
        Self { fields }
    }

    /// Look up a field by id.
    pub fn field(&self, field_id: i32) -> Option<&NestedField> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    /// Positional index of a field by id.
    pub fn index_of(&self, field_id: i32) -> Option<usize> {
        self.fields.iter().position(|f| f.field_id == field_id)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ids_are_distinct() {
        let ids = [
            ROW_POSITION_FIELD_ID,
            IS_DELETED_FIELD_ID,
            ROW_ID_FIELD_ID,
            LAST_UPDATED_SEQUENCE_NUMBER_FIELD_ID,
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_index_of_matches_field_order() {
        let expected = StructType::new(vec![
            NestedField::required(1, "id", FieldType::Long),
            NestedField::optional(2, "name", FieldType::String),
        ]);
        assert_eq!(expected.index_of(1), Some(0));
        assert_eq!(expected.index_of(2), Some(1));
        assert_eq!(expected.index_of(3), None);
        assert_eq!(expected.field(2).map(|f| f.name.as_str()), Some("name"));
    }

    #[test]
    fn test_display_names_types() {
        let ty = FieldType::Map {
            key: Box::new(FieldType::Int),
            value: Box::new(FieldType::List(Box::new(FieldType::String))),
        };
        assert_eq!(ty.to_string(), "map<int, list<string>>");
    }
}
