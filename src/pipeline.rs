//! End-to-end delta pipeline
//!
//! Wires the components together for the common case: two unsorted TSV
//! dumps in, one incremental-load SQL script out.
//!
//! Each dump is sorted by its key-field positions into a `.sorted` sibling
//! file, then both are streamed through the leapfrog merge into a file
//! sink with the MySQL serializer.

use std::path::{Path, PathBuf};

use crate::codec::MysqlTsvCodec;
use crate::comparator::NumericKeyComparator;
use crate::config::Config;
use crate::cursor::FileCursor;
use crate::delta::{self, FileDeltaSink, MysqlDeltaSerializer};
use crate::error::{DeltaError, Result};
use crate::sorter;

/// Generate an incremental-load SQL script from two TSV dumps
///
/// `old_dump` and `new_dump` need not be sorted; sorted copies are written
/// next to them with a `.sorted` suffix and left in place for inspection.
/// On failure, partially written outputs are not removed — the caller owns
/// cleanup.
pub fn generate(old_dump: &Path, new_dump: &Path, output: &Path, config: &Config) -> Result<()> {
    let sort_positions = key_positions(config)?;
    let codec = MysqlTsvCodec::new();

    tracing::info!(
        "generating delta script for table {}: {} -> {}",
        config.table,
        old_dump.display(),
        new_dump.display()
    );

    let sorted_old = sorted_path(old_dump);
    let sorted_new = sorted_path(new_dump);
    sorter::sort(old_dump, &sorted_old, &sort_positions, &codec)?;
    sorter::sort(new_dump, &sorted_new, &sort_positions, &codec)?;

    let mut old_cursor = FileCursor::open(&sorted_old, config.fields.clone(), codec)?;
    let mut new_cursor = FileCursor::open(&sorted_new, config.fields.clone(), codec)?;

    let mut comparator = NumericKeyComparator::new(config.key_fields.clone());
    comparator.set_enforce_numeric(config.enforce_numeric_keys);

    let mut serializer = MysqlDeltaSerializer::new(&config.table);
    serializer.set_use_ignore(config.use_ignore);
    let mut sink = FileDeltaSink::create(output, serializer)?;

    delta::calculate(
        &mut old_cursor,
        &mut new_cursor,
        &config.key_fields,
        &comparator,
        &mut sink,
    )?;

    tracing::info!("delta script written to {}", output.display());
    Ok(())
}

/// Resolve the key fields to their zero-based positions in the schema
fn key_positions(config: &Config) -> Result<Vec<usize>> {
    config
        .key_fields
        .iter()
        .map(|key_field| {
            config
                .fields
                .iter()
                .position(|field| field == key_field)
                .ok_or_else(|| {
                    DeltaError::Config(format!(
                        "key field {} is not in the field list",
                        key_field
                    ))
                })
        })
        .collect()
}

/// Sibling path for the sorted copy of a dump
fn sorted_path(dump: &Path) -> PathBuf {
    let mut path = dump.as_os_str().to_os_string();
    path.push(".sorted");
    PathBuf::from(path)
}
