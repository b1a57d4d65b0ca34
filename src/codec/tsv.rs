//! MySQL-compatible TSV codec
//!
//! Implements the default MySQL `LOAD DATA INFILE` serialization rules
//! (https://dev.mysql.com/doc/refman/8.0/en/load-data.html):
//!
//! - the escape character itself, the field terminator, and the line
//!   terminator are prefixed with the escape character on output;
//! - ASCII 0 is written as escape + the printable digit `0`, not a
//!   zero-valued byte;
//! - NULL is written as the two-character literal `\N`;
//! - on input, occurrences of the escape character are stripped and the
//!   following character is taken literally (`\0` decodes back to ASCII 0).

use std::io::BufRead;

use crate::record::Value;

use super::{RecordCodec, DELIMITER, ESCAPE, TERMINATOR};

/// The two-byte NULL marker, `\N`
pub const NULL_MARKER: &[u8] = b"\\N";

/// Escaping table: byte in a field value -> byte written after the escape
/// marker. First match wins; any byte not listed passes through verbatim.
const ESCAPED_BYTES: [(u8, u8); 4] = [
    (ESCAPE, ESCAPE),
    (TERMINATOR, TERMINATOR),
    (DELIMITER, DELIMITER),
    (0x00, b'0'),
];

/// TSV codec using the default MySQL serialization rules
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlTsvCodec;

impl MysqlTsvCodec {
    pub fn new() -> Self {
        MysqlTsvCodec
    }
}

impl RecordCodec for MysqlTsvCodec {
    fn serialize(&self, values: &[Value]) -> Vec<u8> {
        let mut line = Vec::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                line.push(DELIMITER);
            }
            match value {
                None => line.extend_from_slice(NULL_MARKER),
                Some(bytes) => escape_into(bytes, &mut line),
            }
        }
        line.push(TERMINATOR);
        line
    }

    fn deserialize(&self, line: &[u8]) -> Vec<Value> {
        // The logical line is terminated; strip the final terminator byte
        let line = match line.last() {
            Some(&TERMINATOR) => &line[..line.len() - 1],
            _ => line,
        };

        // Split at unescaped delimiters. An <escape><byte> pair is atomic and
        // never a split point, so the scan consumes pairs before checking for
        // delimiter-ness.
        let mut values = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < line.len() {
            match line[i] {
                ESCAPE => i += 2,
                DELIMITER => {
                    values.push(decode_field(&line[start..i]));
                    start = i + 1;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        values.push(decode_field(&line[start..]));
        values
    }

    fn read_logical_line(&self, reader: &mut dyn BufRead) -> std::io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let start = line.len();
            let read = reader.read_until(TERMINATOR, &mut line)?;
            if read == 0 {
                // End of stream with no data, or in the middle of an
                // unterminated record: no more records either way.
                return Ok(None);
            }
            if ends_unescaped(&line[start..]) {
                return Ok(Some(line));
            }
        }
    }
}

/// Append the escaped form of a field value
fn escape_into(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        match escaped(b) {
            Some(substitute) => {
                out.push(ESCAPE);
                out.push(substitute);
            }
            None => out.push(b),
        }
    }
}

/// Look up the escape substitute for a byte, if it needs escaping
fn escaped(b: u8) -> Option<u8> {
    ESCAPED_BYTES
        .iter()
        .find(|(raw, _)| *raw == b)
        .map(|(_, substitute)| *substitute)
}

/// Decode one raw (still escaped) field into a value
fn decode_field(raw: &[u8]) -> Value {
    if raw == NULL_MARKER {
        return None;
    }
    let mut value = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == ESCAPE {
            if i + 1 < raw.len() {
                value.push(if raw[i + 1] == b'0' { 0x00 } else { raw[i + 1] });
            }
            // a trailing lone escape marker is dropped
            i += 2;
        } else {
            value.push(raw[i]);
            i += 1;
        }
    }
    Some(value)
}

/// True if a physical line ends in an unescaped terminator
///
/// The terminator is unescaped iff it is preceded by an even number of
/// escape-marker bytes (zero included). An odd count means the terminator is
/// escaped field content and the logical record continues on the next
/// physical line. Physical lines always start at an escape-pair boundary, so
/// counting within the line is exact.
fn ends_unescaped(physical_line: &[u8]) -> bool {
    match physical_line.last() {
        Some(&TERMINATOR) => {}
        _ => return false,
    }
    let backslashes = physical_line[..physical_line.len() - 1]
        .iter()
        .rev()
        .take_while(|&&b| b == ESCAPE)
        .count();
    backslashes % 2 == 0
}
