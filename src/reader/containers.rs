//! Readers for Avro container types: arrays, maps, and unions.
//!
//! Arrays and maps are encoded as a sequence of chunks terminated by a
//! zero-length chunk. Container readers recycle the caller's previous
//! instance when its kind matches: the old allocation backs the new row and
//! the old elements are handed to child readers as per-element reuse hints.

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::reader::{BoxedReader, ValueReader};
use crate::value::Value;

/// Take a hint out of a prior-row slot, mapping null to "no hint".
#[inline]
fn take_hint(slot: &mut Value) -> Option<Value> {
    match std::mem::replace(slot, Value::Null) {
        Value::Null => None,
        value => Some(value),
    }
}

/// Reads arrays into `Value::List`.
pub struct ListReader {
    element: BoxedReader,
    /// Elements of the last reused row, consumed as per-element hints.
    prior: Vec<Value>,
}

impl ListReader {
    pub(crate) fn new(element: BoxedReader) -> Self {
        Self {
            element,
            prior: Vec::new(),
        }
    }
}

impl ValueReader for ListReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        self.prior.clear();
        let mut items = match reuse {
            Some(Value::List(mut last)) => {
                // Keep the previous elements as hints; the emptied vector
                // from the row before backs the new row.
                std::mem::swap(&mut self.prior, &mut last);
                last
            }
            _ => Vec::new(),
        };
        items.clear();

        let mut hint_idx = 0;
        let mut chunk = decoder.read_array_start()?;
        while chunk > 0 {
            items.reserve(chunk as usize);
            for _ in 0..chunk {
                let hint = if hint_idx < self.prior.len() {
                    hint_idx += 1;
                    take_hint(&mut self.prior[hint_idx - 1])
                } else {
                    None
                };
                items.push(self.element.read(decoder, hint)?);
            }
            chunk = decoder.array_next()?;
        }

        Ok(Value::List(items))
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        let mut items_to_skip = decoder.skip_array()?;
        while items_to_skip != 0 {
            for _ in 0..items_to_skip {
                self.element.skip(decoder)?;
            }
            items_to_skip = decoder.skip_array()?;
        }
        Ok(())
    }
}

/// Reads string-keyed maps encoded with Avro map framing.
pub struct MapReader {
    key: BoxedReader,
    value: BoxedReader,
    prior: Vec<(Value, Value)>,
}

impl MapReader {
    pub(crate) fn new(key: BoxedReader, value: BoxedReader) -> Self {
        Self {
            key,
            value,
            prior: Vec::new(),
        }
    }
}

impl ValueReader for MapReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        read_map_entries(
            &mut *self.key,
            &mut *self.value,
            &mut self.prior,
            reuse,
            decoder,
            MapFraming::Map,
        )
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        let mut entries_to_skip = decoder.skip_map()?;
        while entries_to_skip != 0 {
            for _ in 0..entries_to_skip {
                self.key.skip(decoder)?;
                self.value.skip(decoder)?;
            }
            entries_to_skip = decoder.skip_map()?;
        }
        Ok(())
    }
}

/// Reads maps encoded as an array of key/value pairs.
///
/// Avro maps only admit string keys; a logical map with any other key type
/// is written as an array of two-field records. The framing is array
/// framing, the result is still a mapping.
pub struct ArrayMapReader {
    key: BoxedReader,
    value: BoxedReader,
    prior: Vec<(Value, Value)>,
}

impl ArrayMapReader {
    pub(crate) fn new(key: BoxedReader, value: BoxedReader) -> Self {
        Self {
            key,
            value,
            prior: Vec::new(),
        }
    }
}

impl ValueReader for ArrayMapReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        read_map_entries(
            &mut *self.key,
            &mut *self.value,
            &mut self.prior,
            reuse,
            decoder,
            MapFraming::Array,
        )
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        let mut pairs_to_skip = decoder.skip_array()?;
        while pairs_to_skip != 0 {
            for _ in 0..pairs_to_skip {
                self.key.skip(decoder)?;
                self.value.skip(decoder)?;
            }
            pairs_to_skip = decoder.skip_array()?;
        }
        Ok(())
    }
}

/// Which decoder framing carries the entries.
enum MapFraming {
    Map,
    Array,
}

fn read_map_entries(
    key_reader: &mut dyn ValueReader,
    value_reader: &mut dyn ValueReader,
    prior: &mut Vec<(Value, Value)>,
    reuse: Option<Value>,
    decoder: &mut dyn Decoder,
    framing: MapFraming,
) -> Result<Value, DecodeError> {
    prior.clear();
    let mut entries = match reuse {
        Some(Value::Map(mut last)) => {
            std::mem::swap(prior, &mut last);
            last
        }
        _ => Vec::new(),
    };
    entries.clear();

    let mut hint_idx = 0;
    let mut chunk = match framing {
        MapFraming::Map => decoder.read_map_start()?,
        MapFraming::Array => decoder.read_array_start()?,
    };
    while chunk > 0 {
        entries.reserve(chunk as usize);
        for _ in 0..chunk {
            let (key_hint, value_hint) = if hint_idx < prior.len() {
                hint_idx += 1;
                let entry = &mut prior[hint_idx - 1];
                (take_hint(&mut entry.0), take_hint(&mut entry.1))
            } else {
                (None, None)
            };
            let key = key_reader.read(decoder, key_hint)?;
            let value = value_reader.read(decoder, value_hint)?;
            entries.push((key, value));
        }
        chunk = match framing {
            MapFraming::Map => decoder.map_next()?,
            MapFraming::Array => decoder.array_next()?,
        };
    }

    Ok(Value::Map(entries))
}

/// Reads unions: a branch index then the chosen branch's value.
pub struct UnionReader {
    branches: Vec<BoxedReader>,
}

impl UnionReader {
    pub(crate) fn new(branches: Vec<BoxedReader>) -> Self {
        Self { branches }
    }

    fn branch(&mut self, index: usize) -> Result<&mut BoxedReader, DecodeError> {
        let len = self.branches.len();
        self.branches.get_mut(index).ok_or_else(|| {
            DecodeError::InvalidData(format!("Union branch {} out of range (0..{})", index, len))
        })
    }
}

impl ValueReader for UnionReader {
    fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
        let index = decoder.read_index()?;
        self.branch(index)?.read(decoder, reuse)
    }

    fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
        // A union does not encode its own length; the index picks the
        // branch that knows how to advance the stream.
        let index = decoder.read_index()?;
        self.branch(index)?.skip(decoder)
    }
}
