//! Delta sinks
//!
//! Collectors of delta actions. The engine calls a sink exactly in the
//! order actions are decided and closes it exactly once at normal
//! completion.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::{DeltaError, Result};
use crate::record::{Key, Record};

use super::sql::DeltaSerializer;

/// Collector of delta actions
pub trait DeltaSink {
    /// Record an insert of a full record
    fn add_insert(&mut self, record: &Record) -> Result<()>;

    /// Record an update: the record's key plus only the changed fields
    fn add_update(&mut self, key: &Key, changed: &Record) -> Result<()>;

    /// Record a delete by key
    fn add_delete(&mut self, key: &Key) -> Result<()>;

    /// Finish the action stream
    fn close(&mut self) -> Result<()>;
}

/// Sink that serializes actions and writes them to a file
pub struct FileDeltaSink<S> {
    path: PathBuf,
    writer: BufWriter<File>,
    serializer: S,
}

impl<S: DeltaSerializer> FileDeltaSink<S> {
    /// Create the output file for writing
    pub fn create(path: impl Into<PathBuf>, serializer: S) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| DeltaError::io(&path, "create", e))?;
        Ok(FileDeltaSink {
            path,
            writer: BufWriter::new(file),
            serializer,
        })
    }

    fn write(&mut self, statement: &str) -> Result<()> {
        self.writer
            .write_all(statement.as_bytes())
            .map_err(|e| DeltaError::io(&self.path, "write", e))
    }
}

impl<S: DeltaSerializer> DeltaSink for FileDeltaSink<S> {
    fn add_insert(&mut self, record: &Record) -> Result<()> {
        let statement = self.serializer.serialize_insert(record)?;
        self.write(&statement)
    }

    fn add_update(&mut self, key: &Key, changed: &Record) -> Result<()> {
        let statement = self.serializer.serialize_update(key, changed)?;
        self.write(&statement)
    }

    fn add_delete(&mut self, key: &Key) -> Result<()> {
        let statement = self.serializer.serialize_delete(key)?;
        self.write(&statement)
    }

    fn close(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| DeltaError::io(&self.path, "flush", e))
    }
}

/// Sink that records actions in memory
///
/// Used by tests and by callers that want the action stream as data rather
/// than as serialized output.
#[derive(Debug, Default)]
pub struct RecordingSink {
    inserts: Vec<Record>,
    updates: Vec<(Key, Record)>,
    deletes: Vec<Key>,
    closed: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inserts(&self) -> &[Record] {
        &self.inserts
    }

    pub fn updates(&self) -> &[(Key, Record)] {
        &self.updates
    }

    pub fn deletes(&self) -> &[Key] {
        &self.deletes
    }

    pub fn closed(&self) -> bool {
        self.closed
    }
}

impl DeltaSink for RecordingSink {
    fn add_insert(&mut self, record: &Record) -> Result<()> {
        self.inserts.push(record.clone());
        Ok(())
    }

    fn add_update(&mut self, key: &Key, changed: &Record) -> Result<()> {
        self.updates.push((key.clone(), changed.clone()));
        Ok(())
    }

    fn add_delete(&mut self, key: &Key) -> Result<()> {
        self.deletes.push(key.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
