//! Byte-oriented decoding layer.
//!
//! The reader tree consumes values through the [`Decoder`] trait, a cursor
//! over an Avro binary stream. [`BinaryDecoder`] is the in-memory
//! implementation over a byte slice.

pub mod binary;
pub mod varint;

pub use binary::BinaryDecoder;
pub use varint::{decode_varint, decode_zigzag, encode_varint, encode_zigzag, skip_varint};

use crate::error::DecodeError;

/// A byte-oriented cursor over an Avro binary stream.
///
/// Array and map content arrives in chunks: `read_array_start` /
/// `array_next` (and the map equivalents) return the number of items in the
/// next chunk, already normalized for block-size-prefixed encodings; a zero
/// count terminates the container.
///
/// The skip entry points mirror that contract: a non-zero return from
/// `skip_array` / `skip_map` means the caller must skip that many items one
/// by one through its child readers, then call again; zero means the
/// container is fully consumed.
pub trait Decoder: Send {
    /// Consume a null value (no bytes).
    fn read_null(&mut self) -> Result<(), DecodeError>;
    /// Read a single-byte boolean.
    fn read_boolean(&mut self) -> Result<bool, DecodeError>;
    /// Read a zigzag varint as i32.
    fn read_int(&mut self) -> Result<i32, DecodeError>;
    /// Read a zigzag varint as i64.
    fn read_long(&mut self) -> Result<i64, DecodeError>;
    /// Read a little-endian IEEE 754 float.
    fn read_float(&mut self) -> Result<f32, DecodeError>;
    /// Read a little-endian IEEE 754 double.
    fn read_double(&mut self) -> Result<f64, DecodeError>;

    /// Read a length-prefixed UTF-8 string into `buf`, clearing it first.
    ///
    /// Callers own the scratch buffer across rows, so the per-row allocation
    /// is only the materialized value.
    fn read_string(&mut self, buf: &mut Vec<u8>) -> Result<(), DecodeError>;
    /// Read a length-prefixed byte array into `buf`, clearing it first.
    fn read_bytes(&mut self, buf: &mut Vec<u8>) -> Result<(), DecodeError>;
    /// Fill `dst` with exactly `dst.len()` raw bytes.
    fn read_fixed(&mut self, dst: &mut [u8]) -> Result<(), DecodeError>;

    /// Read an enum symbol index.
    fn read_enum(&mut self) -> Result<usize, DecodeError>;
    /// Read a union branch index.
    fn read_index(&mut self) -> Result<usize, DecodeError>;

    /// Begin an array; returns the first chunk's item count.
    fn read_array_start(&mut self) -> Result<u64, DecodeError>;
    /// Next array chunk's item count; zero terminates.
    fn array_next(&mut self) -> Result<u64, DecodeError>;
    /// Begin a map; returns the first chunk's entry count.
    fn read_map_start(&mut self) -> Result<u64, DecodeError>;
    /// Next map chunk's entry count; zero terminates.
    fn map_next(&mut self) -> Result<u64, DecodeError>;

    /// Skip a length-prefixed string.
    fn skip_string(&mut self) -> Result<(), DecodeError>;
    /// Skip a length-prefixed byte array.
    fn skip_bytes(&mut self) -> Result<(), DecodeError>;
    /// Skip `len` raw bytes.
    fn skip_fixed(&mut self, len: usize) -> Result<(), DecodeError>;
    /// Skip array chunks; non-zero return means skip that many items.
    fn skip_array(&mut self) -> Result<u64, DecodeError>;
    /// Skip map chunks; non-zero return means skip that many entries.
    fn skip_map(&mut self) -> Result<u64, DecodeError>;
}
