//! Error types for value decoding and read-plan construction.

use std::io;
use thiserror::Error;

/// Errors that can occur while decoding values from the byte stream.
///
/// Decode errors are terminal for the current row and for the reader tree:
/// a partially decoded struct is invalid and must be discarded by the caller.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid Avro data
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// Unexpected end of data
    #[error("Unexpected end of input")]
    UnexpectedEof,
    /// Invalid varint encoding
    #[error("Invalid varint encoding")]
    InvalidVarint,
    /// String is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// IO error from the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that can occur while building a read plan or a reader tree.
///
/// Plan errors happen before decoding begins; a failed plan never advances
/// the decoder.
#[derive(Debug, Error)]
pub enum PlanError {
    /// An expected field is required, absent from the file, and has neither
    /// a constant nor an initial default.
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// A decimal reader was requested against a physical type that is not
    /// fixed or bytes.
    #[error("Invalid primitive type for decimal: {0}")]
    InvalidDecimalEncoding(String),

    /// Writer and expected types cannot be reconciled by Avro resolution.
    #[error("Cannot read {writer} as {expected}")]
    IncompatibleTypes {
        /// The writer-side type, as found in the file schema
        writer: String,
        /// The expected-side type requested by the caller
        expected: String,
    },

    /// Malformed or unsupported schema
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}
