//! Readers whose values depend on the row index within the file.

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::reader::{BoxedReader, ValueReader};
use crate::value::Value;

/// Synthesizes the zero-based row position within the file.
///
/// Holds a counter that advances on every read. Injecting a supplier resets
/// the counter to `supplier() - 1` so the next read returns exactly the
/// supplied position.
pub struct PositionReader {
    current: i64,
}

impl PositionReader {
    pub(crate) fn new() -> Self {
        Self { current: 0 }
    }
}

impl ValueReader for PositionReader {
    fn read(&mut self, _decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        self.current += 1;
        Ok(Value::Long(self.current))
    }

    fn skip(&mut self, _decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        Ok(())
    }

    fn set_row_position_supplier(&mut self, supplier: &dyn Fn() -> i64) {
        self.current = supplier() - 1;
    }
}

/// Reads row ids, falling back to `first_row_id + position` for rows whose
/// id is null in the file.
pub struct RowIdReader {
    first_row_id: i64,
    id_reader: BoxedReader,
    position_reader: PositionReader,
}

impl RowIdReader {
    pub(crate) fn new(first_row_id: i64, id_reader: BoxedReader) -> Self {
        Self {
            first_row_id,
            id_reader,
            position_reader: PositionReader::new(),
        }
    }
}

impl ValueReader for RowIdReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        let id_from_file = self.id_reader.read(decoder, reuse)?;
        // The position advances for every row, null id or not
        let position = match self.position_reader.read(decoder, None)? {
            Value::Long(pos) => pos,
            other => {
                return Err(DecodeError::InvalidData(format!(
                    "Position reader produced {:?}",
                    other
                )))
            }
        };

        match id_from_file.as_long() {
            Some(id) => Ok(Value::Long(id)),
            None => Ok(Value::Long(self.first_row_id + position)),
        }
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        self.id_reader.skip(decoder)?;
        self.position_reader.skip(decoder)
    }

    fn set_row_position_supplier(&mut self, supplier: &dyn Fn() -> i64) {
        self.position_reader.set_row_position_supplier(supplier);
    }
}

/// Reads per-row sequence numbers, falling back to the file-level sequence
/// number for rows whose value is null.
///
/// The file sequence number is captured at construction; creation is gated
/// on both it and the base row id being known, but only the sequence number
/// participates in decoding.
pub struct LastUpdatedSeqReader {
    file_seq_number: i64,
    seq_reader: BoxedReader,
}

impl LastUpdatedSeqReader {
    pub(crate) fn new(file_seq_number: i64, seq_reader: BoxedReader) -> Self {
        Self {
            file_seq_number,
            seq_reader,
        }
    }
}

impl ValueReader for LastUpdatedSeqReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        let row_seq_number = self.seq_reader.read(decoder, reuse)?;
        match row_seq_number.as_long() {
            Some(seq) => Ok(Value::Long(seq)),
            None => Ok(Value::Long(self.file_seq_number)),
        }
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        self.seq_reader.skip(decoder)
    }
}
