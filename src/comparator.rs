//! Key comparators
//!
//! Orders two records by comparing values at a configured list of key
//! fields, field by field, short-circuiting on the first non-equal field.

use std::cmp::Ordering;

use crate::error::{DeltaError, Result, Side};
use crate::record::Record;

/// Comparison of two records for determining their order
pub trait Comparator {
    /// Compare the key fields of two records
    fn compare(&self, left: &Record, right: &Record) -> Result<Ordering>;
}

/// Compares records by the values at a given list of key fields
///
/// By default every compared value must be numeric and a non-numeric value
/// is an error. The requirement can be relaxed, in which case values are
/// compared numerically when both sides parse as numbers and
/// byte-lexicographically otherwise.
#[derive(Debug, Clone)]
pub struct NumericKeyComparator {
    key_fields: Vec<String>,
    enforce_numeric: bool,
}

impl NumericKeyComparator {
    pub fn new(key_fields: Vec<String>) -> Self {
        NumericKeyComparator {
            key_fields,
            enforce_numeric: true,
        }
    }

    /// Toggle numeric enforcement (per instance, not per call)
    pub fn set_enforce_numeric(&mut self, enforce: bool) {
        self.enforce_numeric = enforce;
    }

    /// The key fields this comparator orders by
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }
}

impl Comparator for NumericKeyComparator {
    fn compare(&self, left: &Record, right: &Record) -> Result<Ordering> {
        for field in &self.key_fields {
            let left_value = left.get(field).and_then(|v| v.as_deref());
            let right_value = right.get(field).and_then(|v| v.as_deref());

            let ordering = if self.enforce_numeric {
                let left_num = require_numeric(field, Side::Left, left_value)?;
                let right_num = require_numeric(field, Side::Right, right_value)?;
                left_num.partial_cmp(&right_num).unwrap_or(Ordering::Equal)
            } else {
                compare_values(left_value, right_value)
            };

            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }
}

/// Parse a key value as a number, or fail naming the field and side
fn require_numeric(field: &str, side: Side, value: Option<&[u8]>) -> Result<f64> {
    parse_numeric(value).ok_or_else(|| DeltaError::NonNumericKeyValue {
        field: field.to_string(),
        side,
        value: match value {
            Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            None => "NULL".to_string(),
        },
    })
}

/// Parse bytes as a number, if possible
fn parse_numeric(value: Option<&[u8]>) -> Option<f64> {
    std::str::from_utf8(value?).ok()?.trim().parse().ok()
}

/// Relaxed generic ordering of two optional values
///
/// Numeric when both sides parse as numbers, byte-lexicographic otherwise;
/// NULL orders before any value.
pub fn compare_values(left: Option<&[u8]>, right: Option<&[u8]>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(l), Some(r)) => match (parse_numeric(Some(l)), parse_numeric(Some(r))) {
            (Some(ln), Some(rn)) => ln.partial_cmp(&rn).unwrap_or(Ordering::Equal),
            _ => l.cmp(r),
        },
    }
}
