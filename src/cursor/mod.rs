//! Record cursors
//!
//! Forward-only, restartable cursors over a sequence of records. The delta
//! engine depends only on the [`RecordCursor`] contract, so an in-memory
//! record list can stand in for a real file.

mod file;
mod memory;

pub use file::FileCursor;
pub use memory::MemoryCursor;

use crate::error::Result;
use crate::record::Record;

/// Forward-only, restartable cursor over records
pub trait RecordCursor {
    /// True while the cursor points at a record
    fn valid(&self) -> bool;

    /// The most recently read record, without reparsing
    ///
    /// `None` once the cursor is exhausted.
    fn current(&self) -> Option<&Record>;

    /// Advance to the next record
    fn next(&mut self) -> Result<()>;

    /// Restart from the first record
    fn rewind(&mut self) -> Result<()>;

    /// Monotonically increasing record counter, for diagnostics only
    ///
    /// This is a position in the stream, not the record's key.
    fn position(&self) -> u64;
}
