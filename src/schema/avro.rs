//! Writer-side Avro schema types.
//!
//! This is the physical schema recorded in a data file. Record fields carry
//! a `field-id` property that ties them to expected-schema fields; the read
//! planner matches on that id and never on field names.

/// A writer-side Avro schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroSchema {
    /// Null type - no value.
    Null,
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
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,
    /// Record type with named fields.
    Record(RecordSchema),
    /// Enumeration type.
    Enum(EnumSchema),
    /// Array of items with a single schema.
    Array(Box<AvroSchema>),
    /// Map with string keys and values of a single schema.
    Map(Box<AvroSchema>),
    /// Union of multiple schemas.
    Union(Vec<AvroSchema>),
    /// Fixed-size byte array.
    Fixed(FixedSchema),
    /// Logical type wrapper.
    Logical(LogicalSchema),
}

impl AvroSchema {
    /// Check if this schema is a union containing null.
    pub fn is_nullable(&self) -> bool {
        match self {
            AvroSchema::Union(variants) => variants.iter().any(|v| matches!(v, AvroSchema::Null)),
            _ => false,
        }
    }

    /// For a two-variant nullable union, get the non-null schema.
    pub fn nullable_inner(&self) -> Option<&AvroSchema> {
        match self {
            AvroSchema::Union(variants) if variants.len() == 2 => {
                variants.iter().find(|v| !matches!(v, AvroSchema::Null))
            }
            _ => None,
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AvroSchema::Null => "null",
            AvroSchema::Boolean => "boolean",
            AvroSchema::Int => "int",
            AvroSchema::Long => "long",
            AvroSchema::Float => "float",
            AvroSchema::Double => "double",
            AvroSchema::Bytes => "bytes",
            AvroSchema::String => "string",
            AvroSchema::Record(_) => "record",
            AvroSchema::Enum(_) => "enum",
            AvroSchema::Array(_) => "array",
            AvroSchema::Map(_) => "map",
            AvroSchema::Union(_) => "union",
            AvroSchema::Fixed(_) => "fixed",
            AvroSchema::Logical(_) => "logical",
        }
    }
}

/// Schema for a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// The name of the record.
    pub name: String,
    /// The fields of the record, in physical write order.
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Create a new RecordSchema with the given name and fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Schema for a field within a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// The name of the field.
    pub name: String,
    /// The schema of the field's value.
    pub schema: AvroSchema,
    /// Stable field id from the `field-id` property, when present.
    pub field_id: Option<i32>,
}

impl FieldSchema {
    /// Create a new FieldSchema with the given name and schema.
    pub fn new(name: impl Into<String>, schema: AvroSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            field_id: None,
        }
    }

    /// Attach the stable field id.
    pub fn with_field_id(mut self, field_id: i32) -> Self {
        self.field_id = Some(field_id);
        self
    }
}

/// Schema for an enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// The name of the enum.
    pub name: String,
    /// The symbols (variants) of the enum.
    pub symbols: Vec<String>,
}

impl EnumSchema {
    /// Create a new EnumSchema with the given name and symbols.
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            symbols,
        }
    }
}

/// Schema for a fixed-size byte array.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    /// The name of the fixed type.
    pub name: String,
    /// The size in bytes.
    pub size: usize,
}

impl FixedSchema {
    /// Create a new FixedSchema with the given name and size.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Logical type wrapper around a base schema.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalSchema {
    /// The underlying Avro schema.
    pub base: Box<AvroSchema>,
    /// The logical annotation.
    pub annotation: LogicalAnnotation,
}

impl LogicalSchema {
    /// Create a new logical wrapper.
    pub fn new(base: AvroSchema, annotation: LogicalAnnotation) -> Self {
        Self {
            base: Box::new(base),
            annotation,
        }
    }
}

/// Logical annotations the reader core interprets.
///
/// Annotations other than these are dropped at parse time and the base type
/// is decoded as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalAnnotation {
    /// UUID stored as a 16-byte fixed.
    Uuid,
    /// Decimal with precision and scale, stored as fixed or bytes.
    Decimal {
        /// Total number of digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_union() {
        let schema = AvroSchema::Union(vec![AvroSchema::Null, AvroSchema::String]);
        assert!(schema.is_nullable());
        assert_eq!(schema.nullable_inner(), Some(&AvroSchema::String));

        let not_nullable = AvroSchema::Union(vec![AvroSchema::Int, AvroSchema::String]);
        assert!(!not_nullable.is_nullable());
        assert_eq!(not_nullable.nullable_inner(), None);
    }

    #[test]
    fn test_field_id_builder() {
        let field = FieldSchema::new("id", AvroSchema::Long).with_field_id(1);
        assert_eq!(field.field_id, Some(1));
    }
}
