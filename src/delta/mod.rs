//! Delta calculation
//!
//! Compares an old and a new dataset, both given as key-sorted cursors, and
//! emits the insert/update/delete actions that transform the old dataset
//! into the new one.

mod engine;
mod sink;
mod sql;

pub use engine::calculate;
pub use sink::{DeltaSink, FileDeltaSink, RecordingSink};
pub use sql::{DeltaSerializer, MysqlDeltaSerializer};
