//! In-memory Avro binary decoder.
//!
//! Cursor-style functions over `&mut &[u8]` do the byte-level work; the
//! [`BinaryDecoder`] wrapper implements the [`Decoder`] trait on top of them.
//! The binary encoding follows the Avro specification:
//! - Varints use zigzag encoding for signed integers
//! - Floats and doubles are little-endian IEEE 754
//! - Bytes and strings are length-prefixed
//! - Array and map content is chunked; a negative chunk count is followed by
//!   a byte size and the absolute value is the item count

use crate::decoder::varint::decode_zigzag;
use crate::decoder::Decoder;
use crate::error::DecodeError;

/// Decode a boolean value.
///
/// Avro booleans are encoded as a single byte: 0x00 for false, 0x01 for true.
#[inline]
pub fn decode_boolean(data: &mut &[u8]) -> Result<bool, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::UnexpectedEof);
    }
    let byte = data[0];
    *data = &data[1..];
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::InvalidData(format!(
            "Invalid boolean value: {}, expected 0 or 1",
            byte
        ))),
    }
}

/// Decode a 32-bit signed integer (zigzag varint encoded).
#[inline]
pub fn decode_int(data: &mut &[u8]) -> Result<i32, DecodeError> {
    let long = decode_zigzag(data)?;
    if long < i32::MIN as i64 || long > i32::MAX as i64 {
        return Err(DecodeError::InvalidData(format!(
            "Integer overflow: {} does not fit in i32",
            long
        )));
    }
    Ok(long as i32)
}

/// Decode a 64-bit signed integer (zigzag varint encoded).
#[inline]
pub fn decode_long(data: &mut &[u8]) -> Result<i64, DecodeError> {
    decode_zigzag(data)
}

/// Decode a 32-bit IEEE 754 floating-point number (little-endian).
#[inline]
pub fn decode_float(data: &mut &[u8]) -> Result<f32, DecodeError> {
    if data.len() < 4 {
        return Err(DecodeError::UnexpectedEof);
    }
    let bytes: [u8; 4] = [data[0], data[1], data[2], data[3]];
    *data = &data[4..];
    Ok(f32::from_le_bytes(bytes))
}

/// Decode a 64-bit IEEE 754 floating-point number (little-endian).
#[inline]
pub fn decode_double(data: &mut &[u8]) -> Result<f64, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::UnexpectedEof);
    }
    let bytes: [u8; 8] = [
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ];
    *data = &data[8..];
    Ok(f64::from_le_bytes(bytes))
}

/// Decode a non-negative length prefix.
#[inline]
fn decode_len(data: &mut &[u8]) -> Result<usize, DecodeError> {
    let len = decode_zigzag(data)?;
    if len < 0 {
        return Err(DecodeError::InvalidData(format!(
            "Negative length: {}",
            len
        )));
    }
    Ok(len as usize)
}

/// Decode a length-prefixed byte sequence into `buf`, clearing it first.
#[inline]
pub fn decode_bytes_into(data: &mut &[u8], buf: &mut Vec<u8>) -> Result<(), DecodeError> {
    let len = decode_len(data)?;
    if data.len() < len {
        return Err(DecodeError::UnexpectedEof);
    }
    buf.clear();
    buf.extend_from_slice(&data[..len]);
    *data = &data[len..];
    Ok(())
}

/// Fill `dst` with exactly `dst.len()` raw bytes.
#[inline]
pub fn decode_fixed_into(data: &mut &[u8], dst: &mut [u8]) -> Result<(), DecodeError> {
    if data.len() < dst.len() {
        return Err(DecodeError::UnexpectedEof);
    }
    dst.copy_from_slice(&data[..dst.len()]);
    *data = &data[dst.len()..];
    Ok(())
}

/// Skip a length-prefixed byte sequence.
#[inline]
pub fn skip_len_prefixed(data: &mut &[u8]) -> Result<(), DecodeError> {
    let len = decode_len(data)?;
    if data.len() < len {
        return Err(DecodeError::UnexpectedEof);
    }
    *data = &data[len..];
    Ok(())
}

/// Decode a non-negative item index (enum symbol or union branch).
#[inline]
fn decode_item_index(data: &mut &[u8]) -> Result<usize, DecodeError> {
    let index = decode_int(data)?;
    if index < 0 {
        return Err(DecodeError::InvalidData(format!(
            "Negative index: {}",
            index
        )));
    }
    Ok(index as usize)
}

/// Read the next chunk count, consuming the byte-size prefix of
/// negative-count chunks.
#[inline]
fn decode_chunk_count(data: &mut &[u8]) -> Result<u64, DecodeError> {
    let count = decode_zigzag(data)?;
    if count < 0 {
        // Block-size-prefixed chunk: the size is only useful for skipping
        let byte_size = decode_zigzag(data)?;
        if byte_size < 0 {
            return Err(DecodeError::InvalidData(format!(
                "Negative chunk byte size: {}",
                byte_size
            )));
        }
        Ok(count.unsigned_abs())
    } else {
        Ok(count as u64)
    }
}

/// Skip chunks whose byte size is known; stop at the first chunk that must
/// be skipped item by item (returned count) or at the terminator (zero).
#[inline]
fn skip_chunks(data: &mut &[u8]) -> Result<u64, DecodeError> {
    loop {
        let count = decode_zigzag(data)?;
        if count < 0 {
            let byte_size = decode_len(data)?;
            if data.len() < byte_size {
                return Err(DecodeError::UnexpectedEof);
            }
            *data = &data[byte_size..];
        } else {
            return Ok(count as u64);
        }
    }
}

/// Decoder over an in-memory byte slice.
///
/// Tracks how many bytes have been consumed, which the alignment tests lean
/// on to prove every physical field is read exactly once.
pub struct BinaryDecoder<'a> {
    data: &'a [u8],
    start_len: usize,
}

impl<'a> BinaryDecoder<'a> {
    /// Create a decoder positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            start_len: data.len(),
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.start_len - self.data.len()
    }

    /// Number of bytes left.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// True when the input is exhausted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Decoder for BinaryDecoder<'_> {
    fn read_null(&mut self) -> Result<(), DecodeError> {
        Ok(())
    }

    fn read_boolean(&mut self) -> Result<bool, DecodeError> {
        decode_boolean(&mut self.data)
    }

    fn read_int(&mut self) -> Result<i32, DecodeError> {
        decode_int(&mut self.data)
    }

    fn read_long(&mut self) -> Result<i64, DecodeError> {
        decode_long(&mut self.data)
    }

    fn read_float(&mut self) -> Result<f32, DecodeError> {
        decode_float(&mut self.data)
    }

    fn read_double(&mut self) -> Result<f64, DecodeError> {
        decode_double(&mut self.data)
    }

    fn read_string(&mut self, buf: &mut Vec<u8>) -> Result<(), DecodeError> {
        decode_bytes_into(&mut self.data, buf)
    }

    fn read_bytes(&mut self, buf: &mut Vec<u8>) -> Result<(), DecodeError> {
        decode_bytes_into(&mut self.data, buf)
    }

    fn read_fixed(&mut self, dst: &mut [u8]) -> Result<(), DecodeError> {
        decode_fixed_into(&mut self.data, dst)
    }

    fn read_enum(&mut self) -> Result<usize, DecodeError> {
        decode_item_index(&mut self.data)
    }

    fn read_index(&mut self) -> Result<usize, DecodeError> {
        decode_item_index(&mut self.data)
    }

    fn read_array_start(&mut self) -> Result<u64, DecodeError> {
        decode_chunk_count(&mut self.data)
    }

    fn array_next(&mut self) -> Result<u64, DecodeError> {
        decode_chunk_count(&mut self.data)
    }

    fn read_map_start(&mut self) -> Result<u64, DecodeError> {
        decode_chunk_count(&mut self.data)
    }

    fn map_next(&mut self) -> Result<u64, DecodeError> {
        decode_chunk_count(&mut self.data)
    }

    fn skip_string(&mut self) -> Result<(), DecodeError> {
        skip_len_prefixed(&mut self.data)
    }

    fn skip_bytes(&mut self) -> Result<(), DecodeError> {
        skip_len_prefixed(&mut self.data)
    }

    fn skip_fixed(&mut self, len: usize) -> Result<(), DecodeError> {
        if self.data.len() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        self.data = &self.data[len..];
        Ok(())
    }

    fn skip_array(&mut self) -> Result<u64, DecodeError> {
        skip_chunks(&mut self.data)
    }

    fn skip_map(&mut self) -> Result<u64, DecodeError> {
        skip_chunks(&mut self.data)
    }
}
