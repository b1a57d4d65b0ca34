//! # snapdelta
//!
//! Streaming delta calculator for keyed datasets: compares two full TSV
//! dumps of a table (old and new snapshot) and produces the minimal set of
//! insert/update/delete actions that transform one into the other, as an
//! incremental-load SQL script. Neither dataset is ever loaded into memory.
//!
//! ## Architecture Overview
//!
//! ```text
//!  unsorted dump (old)          unsorted dump (new)
//!         │                            │
//!         ▼                            ▼
//!  ┌─────────────┐              ┌─────────────┐
//!  │   Sorter    │              │   Sorter    │   two-pass, offset-indexed
//!  └──────┬──────┘              └──────┬──────┘   (RecordCodec for pass 1)
//!         │                            │
//!         ▼                            ▼
//!  ┌─────────────┐              ┌─────────────┐
//!  │ FileCursor  │              │ FileCursor  │   one record in flight
//!  └──────┬──────┘              └──────┬──────┘
//!         │                            │
//!         └─────────────┬──────────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │  DeltaEngine  │   leapfrog merge (KeyComparator)
//!               └───────┬───────┘
//!                       ▼
//!               ┌───────────────┐
//!               │   DeltaSink   │   SQL statements to file
//!               └───────────────┘
//! ```
//!
//! Everything is single-threaded and fully synchronous; failures abort the
//! current operation and surface as typed [`DeltaError`] values.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod comparator;
pub mod cursor;
pub mod sorter;
pub mod delta;
pub mod pipeline;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Dataset, DeltaError, Result, Side};
pub use config::Config;
pub use record::{Key, Record, Value};
pub use codec::{MysqlTsvCodec, RecordCodec};
pub use comparator::{Comparator, NumericKeyComparator};
pub use cursor::{FileCursor, MemoryCursor, RecordCursor};
pub use delta::{DeltaSerializer, DeltaSink, FileDeltaSink, MysqlDeltaSerializer, RecordingSink};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of snapdelta
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
