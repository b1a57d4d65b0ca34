//! Tests for the leapfrog delta engine
//!
//! These tests verify:
//! - Insert/update/delete classification over sorted inputs
//! - Update minimality (only changed fields, nothing when equal)
//! - Close semantics: exactly once on success, never on failure
//! - Early sortedness violations, including on the drain paths

use snapdelta::{
    delta, Comparator, Dataset, DeltaError, MemoryCursor, NumericKeyComparator, Record,
    RecordingSink,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(pairs: &[(&str, Option<&str>)]) -> Record {
    Record::from_pairs(
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.map(|v| v.as_bytes().to_vec())))
            .collect(),
    )
}

fn key_fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn run(
    old: Vec<Record>,
    new: Vec<Record>,
    keys: &[&str],
) -> Result<RecordingSink, (DeltaError, RecordingSink)> {
    let keys = key_fields(keys);
    let comparator = NumericKeyComparator::new(keys.clone());
    let mut old_cursor = MemoryCursor::new(old);
    let mut new_cursor = MemoryCursor::new(new);
    let mut sink = RecordingSink::new();

    match delta::calculate(&mut old_cursor, &mut new_cursor, &keys, &comparator, &mut sink) {
        Ok(()) => Ok(sink),
        Err(e) => Err((e, sink)),
    }
}

// =============================================================================
// Boundary Scenarios
// =============================================================================

#[test]
fn test_insert_into_empty_old() {
    let sink = run(
        vec![],
        vec![record(&[("pk", Some("1")), ("s", Some("a"))])],
        &["pk"],
    )
    .unwrap();

    assert_eq!(sink.inserts().len(), 1);
    assert_eq!(
        sink.inserts()[0],
        record(&[("pk", Some("1")), ("s", Some("a"))])
    );
    assert_eq!(sink.updates().len(), 0);
    assert_eq!(sink.deletes().len(), 0);
    assert!(sink.closed());
}

#[test]
fn test_delete_to_empty_new() {
    let sink = run(
        vec![record(&[("pk", Some("1")), ("s", Some("a"))])],
        vec![],
        &["pk"],
    )
    .unwrap();

    assert_eq!(sink.inserts().len(), 0);
    assert_eq!(sink.updates().len(), 0);
    assert_eq!(sink.deletes().len(), 1);
    assert_eq!(sink.deletes()[0], record(&[("pk", Some("1"))]));
    assert!(sink.closed());
}

#[test]
fn test_inserts_before_between_and_after_existing_keys() {
    let old = vec![
        record(&[("pk1", Some("1")), ("pk2", Some("2")), ("s", Some("abc"))]),
        record(&[("pk1", Some("1")), ("pk2", Some("5")), ("s", Some("def"))]),
    ];
    let new = vec![
        record(&[("pk1", Some("1")), ("pk2", Some("1")), ("s", Some("ABC"))]),
        record(&[("pk1", Some("1")), ("pk2", Some("2")), ("s", Some("abc"))]),
        record(&[("pk1", Some("1")), ("pk2", Some("4")), ("s", Some("mno"))]),
        record(&[("pk1", Some("1")), ("pk2", Some("5")), ("s", Some("def"))]),
        record(&[("pk1", Some("2")), ("pk2", Some("0")), ("s", Some("DEF"))]),
    ];

    let sink = run(old, new, &["pk1", "pk2"]).unwrap();

    assert_eq!(sink.inserts().len(), 3);
    assert_eq!(sink.updates().len(), 0);
    assert_eq!(sink.deletes().len(), 0);

    assert_eq!(
        sink.inserts()[0],
        record(&[("pk1", Some("1")), ("pk2", Some("1")), ("s", Some("ABC"))])
    );
    assert_eq!(
        sink.inserts()[1],
        record(&[("pk1", Some("1")), ("pk2", Some("4")), ("s", Some("mno"))])
    );
    assert_eq!(
        sink.inserts()[2],
        record(&[("pk1", Some("2")), ("pk2", Some("0")), ("s", Some("DEF"))])
    );
    assert!(sink.closed());
}

#[test]
fn test_deletes_interleaved() {
    let old = vec![
        record(&[("pk", Some("2")), ("s", Some("abc"))]),
        record(&[("pk", Some("3")), ("s", Some("def"))]),
        record(&[("pk", Some("4")), ("s", Some("ghi"))]),
        record(&[("pk", Some("5")), ("s", Some("jkl"))]),
        record(&[("pk", Some("6")), ("s", Some("mno"))]),
    ];
    let new = vec![
        record(&[("pk", Some("3")), ("s", Some("def"))]),
        record(&[("pk", Some("5")), ("s", Some("jkl"))]),
    ];

    let sink = run(old, new, &["pk"]).unwrap();

    assert_eq!(sink.inserts().len(), 0);
    assert_eq!(sink.updates().len(), 0);
    assert_eq!(sink.deletes().len(), 3);
    assert_eq!(sink.deletes()[0], record(&[("pk", Some("2"))]));
    assert_eq!(sink.deletes()[1], record(&[("pk", Some("4"))]));
    assert_eq!(sink.deletes()[2], record(&[("pk", Some("6"))]));
}

#[test]
fn test_mixed_actions() {
    let old = vec![
        record(&[("pk", Some("2")), ("s", Some("abc"))]),
        record(&[("pk", Some("3")), ("s", Some("def"))]),
        record(&[("pk", Some("4")), ("s", Some("ghi"))]),
    ];
    let new = vec![
        record(&[("pk", Some("1")), ("s", Some("qwe"))]),
        record(&[("pk", Some("2")), ("s", Some("abc"))]),
        record(&[("pk", Some("3")), ("s", Some("DEF"))]),
    ];

    let sink = run(old, new, &["pk"]).unwrap();

    assert_eq!(sink.inserts().len(), 1);
    assert_eq!(sink.updates().len(), 1);
    assert_eq!(sink.deletes().len(), 1);

    assert_eq!(sink.inserts()[0], record(&[("pk", Some("1")), ("s", Some("qwe"))]));
    let (update_key, changed) = &sink.updates()[0];
    assert_eq!(update_key, &record(&[("pk", Some("3"))]));
    assert_eq!(changed, &record(&[("s", Some("DEF"))]));
    assert_eq!(sink.deletes()[0], record(&[("pk", Some("4"))]));
}

// =============================================================================
// Idempotence and Update Minimality
// =============================================================================

#[test]
fn test_identical_datasets_emit_nothing_but_still_close() {
    let records = vec![
        record(&[("pk", Some("1")), ("s", Some("a"))]),
        record(&[("pk", Some("2")), ("s", Some("b"))]),
    ];

    let sink = run(records.clone(), records, &["pk"]).unwrap();

    assert_eq!(sink.inserts().len(), 0);
    assert_eq!(sink.updates().len(), 0);
    assert_eq!(sink.deletes().len(), 0);
    assert!(sink.closed());
}

#[test]
fn test_update_carries_only_the_changed_field() {
    let old = vec![record(&[
        ("pk", Some("1")),
        ("s1", Some("same")),
        ("s2", Some("old")),
    ])];
    let new = vec![record(&[
        ("pk", Some("1")),
        ("s1", Some("same")),
        ("s2", Some("new")),
    ])];

    let sink = run(old, new, &["pk"]).unwrap();

    assert_eq!(sink.updates().len(), 1);
    let (_, changed) = &sink.updates()[0];
    assert_eq!(changed, &record(&[("s2", Some("new"))]));
}

#[test]
fn test_null_to_value_is_a_change() {
    let old = vec![record(&[("pk", Some("1")), ("s", None)])];
    let new = vec![record(&[("pk", Some("1")), ("s", Some("x"))])];

    let sink = run(old, new, &["pk"]).unwrap();

    assert_eq!(sink.updates().len(), 1);
    let (_, changed) = &sink.updates()[0];
    assert_eq!(changed, &record(&[("s", Some("x"))]));
}

#[test]
fn test_value_to_null_is_a_change() {
    let old = vec![record(&[("pk", Some("1")), ("s", Some("x"))])];
    let new = vec![record(&[("pk", Some("1")), ("s", None)])];

    let sink = run(old, new, &["pk"]).unwrap();

    assert_eq!(sink.updates().len(), 1);
    let (_, changed) = &sink.updates()[0];
    assert_eq!(changed, &record(&[("s", None)]));
}

// =============================================================================
// Sortedness Verification
// =============================================================================

#[test]
fn test_disorder_in_old_detected_at_offending_record() {
    let old = vec![
        record(&[("pk", Some("1")), ("s", Some("a"))]),
        record(&[("pk", Some("3")), ("s", Some("b"))]),
        record(&[("pk", Some("2")), ("s", Some("c"))]),
    ];
    let new: Vec<Record> = vec![];

    let (error, sink) = run(old, new, &["pk"]).unwrap_err();

    match error {
        DeltaError::SortOrderViolation { dataset, .. } => assert_eq!(dataset, Dataset::Old),
        other => panic!("expected SortOrderViolation, got {:?}", other),
    }

    // the two in-order records were already emitted; no rollback
    assert_eq!(sink.deletes().len(), 2);
    // the sink is not closed on the error path
    assert!(!sink.closed());
}

#[test]
fn test_disorder_in_new_detected_at_offending_record() {
    let old: Vec<Record> = vec![];
    let new = vec![
        record(&[("pk", Some("1")), ("s", Some("a"))]),
        record(&[("pk", Some("3")), ("s", Some("b"))]),
        record(&[("pk", Some("2")), ("s", Some("c"))]),
    ];

    let (error, sink) = run(old, new, &["pk"]).unwrap_err();

    match error {
        DeltaError::SortOrderViolation { dataset, .. } => assert_eq!(dataset, Dataset::New),
        other => panic!("expected SortOrderViolation, got {:?}", other),
    }
    assert_eq!(sink.inserts().len(), 2);
    assert!(!sink.closed());
}

#[test]
fn test_sortedness_state_spans_merge_and_drain_phases() {
    // the new side hands key 2 to the engine during the merge phase, then
    // key 1 during the drain: the same per-side check must catch it
    let old = vec![record(&[("pk", Some("1")), ("s", Some("a"))])];
    let new = vec![
        record(&[("pk", Some("2")), ("s", Some("b"))]),
        record(&[("pk", Some("1")), ("s", Some("c"))]),
    ];

    let (error, sink) = run(old, new, &["pk"]).unwrap_err();

    assert!(matches!(
        error,
        DeltaError::SortOrderViolation {
            dataset: Dataset::New,
            ..
        }
    ));
    assert!(!sink.closed());
}

#[test]
fn test_equal_adjacent_keys_are_not_a_violation() {
    // non-decreasing means duplicates pass the check
    let old = vec![
        record(&[("pk", Some("1")), ("s", Some("a"))]),
        record(&[("pk", Some("1")), ("s", Some("b"))]),
    ];
    let new: Vec<Record> = vec![];

    let sink = run(old, new, &["pk"]).unwrap();
    assert_eq!(sink.deletes().len(), 2);
}

// =============================================================================
// Comparator Failure Propagation
// =============================================================================

#[test]
fn test_comparator_failure_aborts_without_closing_sink() {
    let old = vec![record(&[("pk", Some("1")), ("s", Some("a"))])];
    let new = vec![record(&[("pk", Some("oops")), ("s", Some("b"))])];

    let (error, sink) = run(old, new, &["pk"]).unwrap_err();

    assert!(matches!(error, DeltaError::NonNumericKeyValue { .. }));
    assert!(!sink.closed());
}

// =============================================================================
// Reusability
// =============================================================================

#[test]
fn test_independent_merges_do_not_share_state() {
    let keys = key_fields(&["pk"]);
    let comparator = NumericKeyComparator::new(keys.clone());

    // first merge ends with a high key on the old side
    let mut old = MemoryCursor::new(vec![record(&[("pk", Some("9")), ("s", Some("z"))])]);
    let mut new = MemoryCursor::new(vec![record(&[("pk", Some("9")), ("s", Some("z"))])]);
    let mut sink = RecordingSink::new();
    delta::calculate(&mut old, &mut new, &keys, &comparator, &mut sink).unwrap();

    // a second merge starting from a lower key must not be flagged
    let mut old = MemoryCursor::new(vec![record(&[("pk", Some("1")), ("s", Some("a"))])]);
    let mut new = MemoryCursor::new(vec![record(&[("pk", Some("1")), ("s", Some("a"))])]);
    let mut sink = RecordingSink::new();
    delta::calculate(&mut old, &mut new, &keys, &comparator, &mut sink).unwrap();
    assert!(sink.closed());
}

// =============================================================================
// Merge Correctness
// =============================================================================

#[test]
fn test_applying_actions_to_old_yields_new() {
    let old = vec![
        record(&[("pk", Some("1")), ("s", Some("a"))]),
        record(&[("pk", Some("2")), ("s", Some("b"))]),
        record(&[("pk", Some("4")), ("s", Some("d"))]),
    ];
    let new = vec![
        record(&[("pk", Some("2")), ("s", Some("B"))]),
        record(&[("pk", Some("3")), ("s", Some("c"))]),
        record(&[("pk", Some("4")), ("s", Some("d"))]),
    ];

    let sink = run(old.clone(), new.clone(), &["pk"]).unwrap();

    // apply the emitted actions to the old dataset
    let mut result: Vec<Record> = old;
    for key in sink.deletes() {
        result.retain(|r| r.get("pk") != key.get("pk"));
    }
    for (key, changed) in sink.updates() {
        for r in result.iter_mut() {
            if r.get("pk") == key.get("pk") {
                let mut updated = Record::new();
                for (field, value) in r.fields() {
                    match changed.get(field) {
                        Some(new_value) => updated.push(field, new_value.clone()),
                        None => updated.push(field, value.clone()),
                    }
                }
                *r = updated;
            }
        }
    }
    for insert in sink.inserts() {
        result.push(insert.clone());
    }

    // compare as key-sorted sets
    result.sort_by(|a, b| {
        NumericKeyComparator::new(key_fields(&["pk"]))
            .compare(a, b)
            .unwrap()
    });
    assert_eq!(result, new);
}
