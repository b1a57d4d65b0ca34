//! In-memory record cursor
//!
//! Implements the cursor contract over a record list, for unit testing and
//! for diffing datasets that already live in memory.

use crate::error::Result;
use crate::record::Record;

use super::RecordCursor;

/// Cursor over an in-memory list of records
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    records: Vec<Record>,
    index: usize,
}

impl MemoryCursor {
    pub fn new(records: Vec<Record>) -> Self {
        MemoryCursor { records, index: 0 }
    }
}

impl RecordCursor for MemoryCursor {
    fn valid(&self) -> bool {
        self.index < self.records.len()
    }

    fn current(&self) -> Option<&Record> {
        self.records.get(self.index)
    }

    fn next(&mut self) -> Result<()> {
        if self.index < self.records.len() {
            self.index += 1;
        }
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        self.index = 0;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.index as u64
    }
}
