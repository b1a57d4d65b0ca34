//! Record codec
//!
//! Serialization of records to delimited, escaped lines and back.
//!
//! ## Wire Format
//!
//! A file is a sequence of terminator-ended records:
//! ```text
//! ┌─────────┬───┬─────────┬───┬─────────┬────┐
//! │ field 0 │TAB│ field 1 │TAB│ field 2 │ LF │
//! └─────────┴───┴─────────┴───┴─────────┴────┘
//! ```
//!
//! Field content containing the delimiter, terminator, escape marker, or a
//! zero byte is escaped, so one *logical* record may span several *physical*
//! lines on disk (an escaped LF keeps its literal byte). The codec owns the
//! "read one logical line" operation that reassembles such records.

mod tsv;

pub use tsv::MysqlTsvCodec;

use std::io::BufRead;

use crate::record::Value;

/// Field delimiter byte (tab)
pub const DELIMITER: u8 = b'\t';

/// Record terminator byte (newline)
pub const TERMINATOR: u8 = b'\n';

/// Escape marker byte (backslash)
pub const ESCAPE: u8 = b'\\';

/// Serialization of a list of field values into a single delimited line
///
/// Implementations are swappable; everything above the codec (cursor,
/// sorter) depends only on this contract.
pub trait RecordCodec {
    /// Serialize values into one terminated line
    fn serialize(&self, values: &[Value]) -> Vec<u8>;

    /// Deserialize one logical line (terminator included) into field values
    fn deserialize(&self, line: &[u8]) -> Vec<Value>;

    /// Read the next logical line from a byte stream
    ///
    /// Returns the raw line bytes, terminator included. `None` means no more
    /// records: end of stream, including end of stream in the middle of an
    /// unterminated record.
    fn read_logical_line(&self, reader: &mut dyn BufRead) -> std::io::Result<Option<Vec<u8>>>;
}
