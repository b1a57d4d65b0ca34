//! External file sort
//!
//! Two-pass, offset-indexed sort for record files too costly to fully
//! materialize in memory as parsed records.
//!
//! Pass 1 reads the file as logical records and builds an in-memory index
//! of `(sort key, byte offset, byte length)` entries — never the record
//! contents. The index is ordered, then pass 2 seeks back into the source
//! file and copies each record's exact byte span to the output verbatim:
//! no re-serialization, no re-parsing.
//!
//! Caller contract: sortable input contains no blank lines (the cursor
//! skips them on iteration, but a blank line inside sorter input would be
//! dropped from the output).

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::codec::{RecordCodec, TERMINATOR};
use crate::comparator::compare_values;
use crate::error::{DeltaError, Result};
use crate::record::Value;

/// One indexed record: extracted sort-key components plus the record's
/// exact byte span in the source file
struct SortIndexEntry {
    key: Vec<Value>,
    offset: u64,
    length: u64,
}

/// Sort the records of `input` into `output`, ascending by the values at
/// the given zero-based field positions
///
/// Key components are compared with the relaxed generic ordering (numeric
/// when both sides parse as numbers, lexicographic otherwise), first
/// differing component wins. Output records are byte-identical to the
/// corresponding input records.
pub fn sort<C: RecordCodec>(
    input: &Path,
    output: &Path,
    sort_positions: &[usize],
    codec: &C,
) -> Result<()> {
    let mut entries = index(input, sort_positions, codec)?;
    entries.sort_by(|a, b| compare_keys(&a.key, &b.key));
    reorder(input, output, &entries)?;

    tracing::debug!(
        "sorted {} records from {} into {}",
        entries.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

/// Pass 1: scan the file and build the sort index
fn index<C: RecordCodec>(
    input: &Path,
    sort_positions: &[usize],
    codec: &C,
) -> Result<Vec<SortIndexEntry>> {
    let file = File::open(input).map_err(|e| DeltaError::io(input, "open", e))?;
    let mut reader = BufReader::new(file);

    let mut entries = Vec::new();
    let mut offset: u64 = 0;
    while let Some(line) = codec
        .read_logical_line(&mut reader)
        .map_err(|e| DeltaError::io(input, "read", e))?
    {
        let length = line.len() as u64;
        if line != [TERMINATOR] {
            let values = codec.deserialize(&line);
            entries.push(SortIndexEntry {
                key: extract_sort_key(&values, sort_positions)?,
                offset,
                length,
            });
        }
        offset += length;
    }
    Ok(entries)
}

/// Build a sort key from the values at the given positions
fn extract_sort_key(values: &[Value], sort_positions: &[usize]) -> Result<Vec<Value>> {
    let mut key = Vec::with_capacity(sort_positions.len());
    for &position in sort_positions {
        if position >= values.len() {
            return Err(DeltaError::InvalidSortPosition {
                position,
                field_count: values.len(),
            });
        }
        key.push(values[position].clone());
    }
    Ok(key)
}

/// Compare two sort keys component-wise, first difference wins
fn compare_keys(left: &[Value], right: &[Value]) -> Ordering {
    for (l, r) in left.iter().zip(right.iter()) {
        let ordering = compare_values(l.as_deref(), r.as_deref());
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Pass 2: copy record byte spans to the output in index order
///
/// Uses a second handle on the input file; the file is not mutated between
/// or during the passes.
fn reorder(input: &Path, output: &Path, entries: &[SortIndexEntry]) -> Result<()> {
    let mut source = File::open(input).map_err(|e| DeltaError::io(input, "open", e))?;
    let sink = File::create(output).map_err(|e| DeltaError::io(output, "create", e))?;
    let mut writer = BufWriter::new(sink);

    for entry in entries {
        source
            .seek(SeekFrom::Start(entry.offset))
            .map_err(|e| DeltaError::io(input, "seek", e))?;
        let mut buf = vec![0u8; entry.length as usize];
        source
            .read_exact(&mut buf)
            .map_err(|e| DeltaError::io(input, "read", e))?;
        writer
            .write_all(&buf)
            .map_err(|e| DeltaError::io(output, "write", e))?;
    }

    writer.flush().map_err(|e| DeltaError::io(output, "flush", e))?;
    Ok(())
}
