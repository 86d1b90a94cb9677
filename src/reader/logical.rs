//! Readers for logical types layered over Avro primitives.

use bytes::Bytes;
use uuid::Uuid;

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::reader::{BoxedReader, ValueReader};
use crate::value::Value;

/// Reads UUIDs stored as 16 raw bytes in big-endian order.
pub struct UuidReader {
    scratch: [u8; 16],
}

impl UuidReader {
    pub(crate) fn new() -> Self {
        Self { scratch: [0; 16] }
    }
}

impl ValueReader for UuidReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        decoder.read_fixed(&mut self.scratch)?;
        // Most-significant half first, then least-significant
        let mut half = [0u8; 8];
        half.copy_from_slice(&self.scratch[..8]);
        let msb = u64::from_be_bytes(half);
        half.copy_from_slice(&self.scratch[8..]);
        let lsb = u64::from_be_bytes(half);
        Ok(Value::Uuid(Uuid::from_u64_pair(msb, lsb)))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_fixed(16)
    }
}

/// Reads decimals as a variable-length unscaled integer plus a scale fixed
/// at construction.
///
/// The unscaled value arrives as big-endian two's-complement bytes from the
/// wrapped fixed or bytes reader. No precision validation happens here;
/// values wider than 128 bits fail rather than truncate.
pub struct DecimalReader {
    unscaled_reader: BoxedReader,
    scale: u32,
}

impl DecimalReader {
    pub(crate) fn new(unscaled_reader: BoxedReader, scale: u32) -> Self {
        Self {
            unscaled_reader,
            scale,
        }
    }
}

impl ValueReader for DecimalReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        // The materialized value is immutable, so the backing buffer cannot
        // be recycled; read without a hint.
        let bytes = match self.unscaled_reader.read(decoder, None)? {
            Value::Bytes(b) | Value::Fixed(b) => b,
            other => {
                return Err(DecodeError::InvalidData(format!(
                    "Decimal unscaled reader produced {:?}, expected bytes",
                    other
                )))
            }
        };
        Ok(Value::Decimal {
            unscaled: unscaled_from_be_bytes(&bytes)?,
            scale: self.scale,
        })
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        self.unscaled_reader.skip(decoder)
    }
}

/// Interpret big-endian two's-complement bytes as an i128.
pub(crate) fn unscaled_from_be_bytes(bytes: &[u8]) -> Result<i128, DecodeError> {
    if bytes.len() > 16 {
        return Err(DecodeError::InvalidData(format!(
            "Decimal too wide: {} bytes",
            bytes.len()
        )));
    }
    if bytes.is_empty() {
        return Ok(0);
    }

    let negative = bytes[0] & 0x80 != 0;
    let mut value: i128 = if negative { -1 } else { 0 };
    for &byte in bytes {
        value = (value << 8) | (byte as i128);
    }
    Ok(value)
}

/// Reads variants: a metadata buffer followed by a value buffer.
///
/// Both buffers are little-endian internally, unlike the surrounding Avro
/// length prefixes; they are carried opaque and the endianness contract is
/// the consumer's.
pub struct VariantReader;

impl ValueReader for VariantReader {
    fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        let mut metadata = Vec::new();
        decoder.read_bytes(&mut metadata)?;
        let mut value = Vec::new();
        decoder.read_bytes(&mut value)?;
        Ok(Value::Variant {
            metadata: Bytes::from(metadata),
            value: Bytes::from(value),
        })
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        decoder.skip_bytes()?;
        decoder.skip_bytes()
    }
}
