//! Readers that synthesize values instead of decoding them.

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::reader::{BoxedReader, ValueReader};
use crate::value::Value;

/// Returns a fixed value on every read. Never touches the decoder.
pub struct ConstantReader {
    constant: Value,
}

impl ConstantReader {
    pub(crate) fn new(constant: Value) -> Self {
        Self { constant }
    }
}

impl ValueReader for ConstantReader {
    fn read(&mut self, _decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        Ok(self.constant.clone())
    }

    fn skip(&mut self, _decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        Ok(())
    }
}

/// Consumes a physical field and returns a constant in its place.
///
/// Used when the file contains a field whose value the caller overrides:
/// the wrapped reader keeps the byte stream aligned, its result is
/// discarded.
pub struct ReplaceWithConstantReader {
    replaced: BoxedReader,
    constant: Value,
}

impl ReplaceWithConstantReader {
    pub(crate) fn new(replaced: BoxedReader, constant: Value) -> Self {
        Self { replaced, constant }
    }
}

impl ValueReader for ReplaceWithConstantReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        self.replaced.read(decoder, reuse)?;
        Ok(self.constant.clone())
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        self.replaced.skip(decoder)
    }
}
