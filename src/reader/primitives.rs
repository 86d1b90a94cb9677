//! Readers for Avro scalar types.
//!
//! Each reader wraps the matching [`Decoder`] primitive. Two promotion
//! readers cover the widenings Avro resolution permits on scalars:
//! int-to-long and float-to-double.

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::reader::ValueReader;
use crate::value::Value;

/// Reads nulls. Consumes no bytes.
pub struct NullReader;

impl ValueReader for NullReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        decoder.read_null()?;
        Ok(Value::Null)
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.read_null()
    }
}

/// Reads single-byte booleans.
pub struct BooleanReader;

impl ValueReader for BooleanReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Boolean(decoder.read_boolean()?))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.read_boolean()?;
        Ok(())
    }
}

/// Reads 32-bit integers.
pub struct IntReader;

impl ValueReader for IntReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Int(decoder.read_int()?))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.read_int()?;
        Ok(())
    }
}

/// Reads int-encoded values as longs (Avro int-to-long promotion).
pub struct IntAsLongReader;

impl ValueReader for IntAsLongReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Long(decoder.read_int()? as i64))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.read_int()?;
        Ok(())
    }
}

/// Reads 64-bit integers.
pub struct LongReader;

impl ValueReader for LongReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Long(decoder.read_long()?))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.read_long()?;
        Ok(())
    }
}

/// Reads 32-bit floats. Skips by its fixed width.
pub struct FloatReader;

impl ValueReader for FloatReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Float(decoder.read_float()?))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_fixed(4)
    }
}

/// Reads float-encoded values as doubles (Avro float-to-double promotion).
pub struct FloatAsDoubleReader;

impl ValueReader for FloatAsDoubleReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Double(decoder.read_float()? as f64))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_fixed(4)
    }
}

/// Reads 64-bit doubles. Skips by its fixed width.
pub struct DoubleReader;

impl ValueReader for DoubleReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(Value::Double(decoder.read_double()?))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_fixed(8)
    }
}

/// Reads UTF-8 strings through the decoder's reusable-buffer entry point.
///
/// The scratch buffer lives on the reader; readers are single-threaded, so
/// this replaces the thread-local a shared-instance design would need. The
/// returned string is always freshly materialized.
pub struct StringReader {
    scratch: Vec<u8>,
}

impl StringReader {
    pub(crate) fn new() -> Self {
        Self {
            scratch: Vec::new(),
        }
    }
}

impl ValueReader for StringReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        decoder.read_string(&mut self.scratch)?;
        let s = std::str::from_utf8(&self.scratch)?;
        Ok(Value::String(s.to_string()))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_string()
    }
}

/// Reads variable-length byte arrays.
///
/// Allocates on every call: the length is unknown until the prefix has been
/// read, so a reused buffer could not be sized ahead of time anyway.
pub struct BytesReader;

impl ValueReader for BytesReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        let mut buf = Vec::new();
        decoder.read_bytes(&mut buf)?;
        Ok(Value::Bytes(buf))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_bytes()
    }
}

/// Reads fixed-length byte arrays, reusing a caller buffer iff its length
/// matches.
pub struct FixedReader {
    length: usize,
}

impl FixedReader {
    pub(crate) fn new(length: usize) -> Self {
        Self { length }
    }
}

impl ValueReader for FixedReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        let mut bytes = match reuse {
            Some(Value::Fixed(reused)) if reused.len() == self.length => reused,
            _ => vec![0u8; self.length],
        };
        decoder.read_fixed(&mut bytes)?;
        Ok(Value::Fixed(bytes))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_fixed(self.length)
    }
}

/// Reads enum values, resolving the symbol from the writer's symbol table.
pub struct EnumReader {
    symbols: Vec<String>,
}

impl EnumReader {
    pub(crate) fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }
}

impl ValueReader for EnumReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        let index = decoder.read_enum()?;
        let symbol = self.symbols.get(index).ok_or_else(|| {
            DecodeError::InvalidData(format!(
                "Enum index {} out of range (0..{})",
                index,
                self.symbols.len()
            ))
        })?;
        Ok(Value::Enum(symbol.clone()))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.read_enum()?;
        Ok(())
    }
}
