//! Sorted leapfrog merge
//!
//! Walks two key-sorted cursors in lockstep, comparing current keys to
//! decide which side to advance and what action to emit:
//!
//! - equal keys: field-wise diff of the two records; an update is emitted
//!   only if some field value differs, then both cursors advance;
//! - old key precedes: the old record no longer exists, emit a delete and
//!   advance the old cursor;
//! - old key follows: the new record did not exist, emit an insert and
//!   advance the new cursor.
//!
//! Once either side is exhausted the remainder of the other drains as
//! deletes (old) or inserts (new). Each side is verified to be
//! non-decreasing in key order as it is consumed; the check spans the merge
//! and drain phases as one continuous per-side sequence check.

use std::cmp::Ordering;

use crate::comparator::Comparator;
use crate::cursor::RecordCursor;
use crate::error::{Dataset, DeltaError, Result};
use crate::record::Record;

use super::sink::DeltaSink;

/// Calculate the delta between two key-sorted datasets
///
/// Actions are passed to the sink in the order they are decided; the sink
/// is closed exactly once at normal completion, even when zero actions were
/// produced. On any failure the merge aborts immediately: actions already
/// emitted remain emitted and the sink is *not* closed — the caller owns
/// cleanup of partial output.
///
/// Sortedness bookkeeping is local to one call, so the same cursors and
/// comparator types are safely reusable across independent merges.
pub fn calculate<C, S>(
    old: &mut dyn RecordCursor,
    new: &mut dyn RecordCursor,
    key_fields: &[String],
    comparator: &C,
    sink: &mut S,
) -> Result<()>
where
    C: Comparator + ?Sized,
    S: DeltaSink + ?Sized,
{
    // last key handed to the engine on each side, scoped to this call
    let mut prev_old: Option<Record> = None;
    let mut prev_new: Option<Record> = None;

    let mut actions: u64 = 0;

    // scan both datasets until one is exhausted
    loop {
        let (old_record, new_record) = match (old.current(), new.current()) {
            (Some(o), Some(n)) => (o.clone(), n.clone()),
            _ => break,
        };

        verify_sorted(&mut prev_old, &old_record, Dataset::Old, comparator)?;
        verify_sorted(&mut prev_new, &new_record, Dataset::New, comparator)?;

        match comparator.compare(&old_record, &new_record)? {
            Ordering::Equal => {
                let changed = changed_fields(&old_record, &new_record);
                if !changed.is_empty() {
                    sink.add_update(&old_record.extract_key(key_fields), &changed)?;
                    actions += 1;
                }
                old.next()?;
                new.next()?;
            }
            Ordering::Less => {
                sink.add_delete(&old_record.extract_key(key_fields))?;
                actions += 1;
                old.next()?;
            }
            Ordering::Greater => {
                sink.add_insert(&new_record)?;
                actions += 1;
                new.next()?;
            }
        }
    }

    // remaining old records no longer exist: drain as deletes
    while let Some(old_record) = old.current().cloned() {
        verify_sorted(&mut prev_old, &old_record, Dataset::Old, comparator)?;
        sink.add_delete(&old_record.extract_key(key_fields))?;
        actions += 1;
        old.next()?;
    }

    // remaining new records did not exist: drain as inserts
    while let Some(new_record) = new.current().cloned() {
        verify_sorted(&mut prev_new, &new_record, Dataset::New, comparator)?;
        sink.add_insert(&new_record)?;
        actions += 1;
        new.next()?;
    }

    sink.close()?;

    tracing::debug!("delta complete: {} actions emitted", actions);
    Ok(())
}

/// Verify one side is still non-decreasing, then remember the record
///
/// Runs before each record is processed, on the merge and drain paths
/// alike; a violation is raised immediately, not deferred.
fn verify_sorted<C>(
    prev: &mut Option<Record>,
    current: &Record,
    dataset: Dataset,
    comparator: &C,
) -> Result<()>
where
    C: Comparator + ?Sized,
{
    if let Some(previous) = prev {
        if comparator.compare(previous, current)? == Ordering::Greater {
            return Err(DeltaError::SortOrderViolation {
                dataset,
                record: current.to_string(),
                previous_key: previous.to_string(),
            });
        }
    }
    *prev = Some(current.clone());
    Ok(())
}

/// Field-wise diff of two equal-keyed records
///
/// Iterates the new record's fields and keeps every field whose new value
/// differs from the old value by strict inequality (null vs non-null
/// differs; a field absent from the old record differs). All fields are
/// diffed, key fields included.
fn changed_fields(old: &Record, new: &Record) -> Record {
    let mut changed = Record::new();
    for (field, value) in new.fields() {
        if old.get(field) != Some(value) {
            changed.push(field, value.clone());
        }
    }
    changed
}
