//! File-backed record cursor
//!
//! Streams logical records out of a TSV file, mapping positional values to
//! a caller-supplied field schema.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::codec::{RecordCodec, TERMINATOR};
use crate::error::{DeltaError, Result};
use crate::record::Record;

use super::RecordCursor;

/// Cursor over logical records in a file
///
/// Holds one record in flight; blank physical lines (a bare terminator) are
/// skipped. The cursor owns its file handle exclusively for the duration of
/// the iteration.
pub struct FileCursor<C> {
    path: PathBuf,
    fields: Vec<String>,
    codec: C,
    reader: BufReader<File>,
    current: Option<Record>,
    position: u64,
}

impl<C: RecordCodec> FileCursor<C> {
    /// Open a file and prime the first record
    pub fn open(path: impl Into<PathBuf>, fields: Vec<String>, codec: C) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| DeltaError::io(&path, "open", e))?;
        let mut cursor = FileCursor {
            path,
            fields,
            codec,
            reader: BufReader::new(file),
            current: None,
            position: 0,
        };
        cursor.next()?;
        Ok(cursor)
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<C: RecordCodec> RecordCursor for FileCursor<C> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    fn next(&mut self) -> Result<()> {
        loop {
            let line = self
                .codec
                .read_logical_line(&mut self.reader)
                .map_err(|e| DeltaError::io(&self.path, "read", e))?;

            match line {
                None => {
                    self.current = None;
                    return Ok(());
                }
                // skip blank physical lines
                Some(line) if line == [TERMINATOR] => continue,
                Some(line) => {
                    let values = self.codec.deserialize(&line);
                    self.current = Some(Record::from_values(&self.fields, values));
                    self.position += 1;
                    return Ok(());
                }
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| DeltaError::io(&self.path, "open", e))?;
        self.reader = BufReader::new(file);
        self.current = None;
        self.position = 0;
        self.next()
    }

    fn position(&self) -> u64 {
        self.position
    }
}
