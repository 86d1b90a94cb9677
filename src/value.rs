//! In-memory representation of decoded rows.
//!
//! Readers produce [`Value`]s; struct readers fill positional [`Record`]s.
//! Containers are plain vectors so that a previous row's instance can be
//! handed back to a reader as a reuse hint and its allocation recycled.

use bytes::Bytes;
use uuid::Uuid;

/// A decoded Avro value shaped by the expected schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Variable-length byte array
    Bytes(Vec<u8>),
    /// Fixed-length byte array
    Fixed(Vec<u8>),
    /// Enum symbol, resolved from the writer's symbol table
    Enum(String),
    /// UUID read as 16 big-endian bytes
    Uuid(Uuid),
    /// Decimal as an unscaled integer plus scale
    Decimal {
        /// Unscaled value, from big-endian two's-complement bytes
        unscaled: i128,
        /// Number of digits after the decimal point
        scale: u32,
    },
    /// Ordered sequence of elements
    List(Vec<Value>),
    /// Key/value mapping in writer order; keys need not be strings
    Map(Vec<(Value, Value)>),
    /// Nested row
    Struct(Record),
    /// Self-describing encoded value; both buffers are interpreted
    /// little-endian by consumers
    Variant {
        /// Variant metadata buffer
        metadata: Bytes,
        /// Variant value buffer
        value: Bytes,
    },
}

impl Value {
    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract an i64, treating `Int` as a widened `Long`.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            Value::Int(v) => Some(*v as i64),
            _ => None,
        }
    }
}

/// A positional row container filled by struct readers.
///
/// Slots are identified by projection position, not by field id; the read
/// plan owns the id-to-position mapping. A record handed back to a struct
/// reader as reuse is cleared slot by slot as new values land.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<Value>,
}

impl Record {
    /// Create a record with `len` null slots.
    pub fn new(len: usize) -> Self {
        Self {
            fields: vec![Value::Null; len],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no slots.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the value at `pos`.
    pub fn get(&self, pos: usize) -> &Value {
        &self.fields[pos]
    }

    /// Store `value` at `pos`.
    pub fn set(&mut self, pos: usize, value: Value) {
        self.fields[pos] = value;
    }

    /// Move the value out of `pos`, leaving null behind.
    ///
    /// Struct readers use this to pass the previous row's value to a child
    /// reader as a reuse hint before storing the freshly decoded value.
    pub fn take(&mut self, pos: usize) -> Value {
        std::mem::replace(&mut self.fields[pos], Value::Null)
    }

    /// Iterate over the slots in positional order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.fields.iter()
    }
}

impl From<Vec<Value>> for Record {
    fn from(fields: Vec<Value>) -> Self {
        Self { fields }
    }
}

/// Factory used by struct readers to create fresh rows.
///
/// The original design instantiated target classes reflectively; here the
/// caller supplies the constructor explicitly and the readers stay free of
/// dynamic lookup.
pub type RecordFactory = Box<dyn Fn() -> Record + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_take_leaves_null() {
        let mut record = Record::from(vec![Value::Int(1), Value::String("a".to_string())]);
        assert_eq!(record.take(1), Value::String("a".to_string()));
        assert_eq!(record.get(1), &Value::Null);
        assert_eq!(record.get(0), &Value::Int(1));
    }

    #[test]
    fn test_record_new_is_all_null() {
        let record = Record::new(3);
        assert_eq!(record.len(), 3);
        assert!(record.iter().all(|v| v.is_null()));
    }

    #[test]
    fn test_as_long_widens_int() {
        assert_eq!(Value::Int(7).as_long(), Some(7));
        assert_eq!(Value::Long(-2).as_long(), Some(-2));
        assert_eq!(Value::Null.as_long(), None);
    }
}
