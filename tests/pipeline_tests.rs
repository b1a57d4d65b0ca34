//! End-to-end pipeline tests
//!
//! These tests verify the full flow: unsorted TSV dumps in, sorted sibling
//! files and an incremental-load SQL script out.

use std::fs;

use snapdelta::{pipeline, Config, DeltaError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn config() -> Config {
    Config::builder()
        .fields(vec!["pk".to_string(), "name".to_string()])
        .key_fields(vec!["pk".to_string()])
        .table("people")
        .build()
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_generate_from_unsorted_dumps() {
    let temp_dir = TempDir::new().unwrap();
    let old = temp_dir.path().join("old.tsv");
    let new = temp_dir.path().join("new.tsv");
    let output = temp_dir.path().join("delta.sql");

    // both dumps deliberately out of key order
    fs::write(&old, b"2\tbob\n1\tada\n3\tcarol\n").unwrap();
    fs::write(&new, b"4\tdan\n1\tada\n2\tbetty\n").unwrap();

    pipeline::generate(&old, &new, &output, &config()).unwrap();

    let script = fs::read_to_string(&output).unwrap();
    assert_eq!(
        script,
        "UPDATE people SET name='betty' WHERE pk='2';\n\
         DELETE FROM people WHERE pk='3';\n\
         INSERT INTO people SET pk='4',name='dan';\n"
    );

    // sorted copies are left next to the inputs
    assert_eq!(
        fs::read(temp_dir.path().join("old.tsv.sorted")).unwrap(),
        b"1\tada\n2\tbob\n3\tcarol\n"
    );
    assert_eq!(
        fs::read(temp_dir.path().join("new.tsv.sorted")).unwrap(),
        b"1\tada\n2\tbetty\n4\tdan\n"
    );
}

#[test]
fn test_identical_dumps_produce_empty_script() {
    let temp_dir = TempDir::new().unwrap();
    let old = temp_dir.path().join("old.tsv");
    let new = temp_dir.path().join("new.tsv");
    let output = temp_dir.path().join("delta.sql");

    fs::write(&old, b"1\tada\n2\tbob\n").unwrap();
    fs::write(&new, b"1\tada\n2\tbob\n").unwrap();

    pipeline::generate(&old, &new, &output, &config()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_escaped_content_survives_the_whole_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let old = temp_dir.path().join("old.tsv");
    let new = temp_dir.path().join("new.tsv");
    let output = temp_dir.path().join("delta.sql");

    fs::write(&old, b"").unwrap();
    // value with an escaped newline spans two physical lines in the dump
    fs::write(&new, b"1\tmulti\\\nline\n").unwrap();

    pipeline::generate(&old, &new, &output, &config()).unwrap();

    let script = fs::read_to_string(&output).unwrap();
    assert_eq!(script, "INSERT INTO people SET pk='1',name='multi\\nline';\n");
}

#[test]
fn test_key_field_not_in_schema_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let old = temp_dir.path().join("old.tsv");
    let new = temp_dir.path().join("new.tsv");
    let output = temp_dir.path().join("delta.sql");
    fs::write(&old, b"").unwrap();
    fs::write(&new, b"").unwrap();

    let config = Config::builder()
        .fields(vec!["pk".to_string()])
        .key_fields(vec!["missing".to_string()])
        .table("people")
        .build();

    let result = pipeline::generate(&old, &new, &output, &config);
    assert!(matches!(result, Err(DeltaError::Config(_))));
}

#[test]
fn test_missing_dump_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let old = temp_dir.path().join("missing.tsv");
    let new = temp_dir.path().join("new.tsv");
    let output = temp_dir.path().join("delta.sql");
    fs::write(&new, b"").unwrap();

    let result = pipeline::generate(&old, &new, &output, &config());
    assert!(matches!(result, Err(DeltaError::Io { .. })));
}
