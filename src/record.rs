//! Record and key types
//!
//! A record is one row of a dataset: an ordered list of named field values.
//! Values are raw byte strings; `None` represents SQL NULL. Records are
//! ephemeral — they are built during deserialization, consumed by the merge
//! step, and discarded.

/// A single field value: raw bytes, or `None` for NULL
pub type Value = Option<Vec<u8>>;

/// A key is the sub-record at the fields designated as identifying
pub type Key = Record;

/// One row of a dataset, as an ordered set of named field values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pairs: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from a list of (field name, value) pairs
    pub fn from_pairs(pairs: Vec<(String, Value)>) -> Self {
        Record { pairs }
    }

    /// Build a record by zipping positional values with a field schema
    ///
    /// Values beyond the schema's field count are dropped.
    pub fn from_values(fields: &[String], values: Vec<Value>) -> Self {
        let pairs = fields
            .iter()
            .cloned()
            .zip(values)
            .collect();
        Record { pairs }
    }

    /// Append a field to the record
    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.pairs.push((field.into(), value));
    }

    /// Look up a value by field name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterate over (field name, value) pairs in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Extract the key sub-record at the given key fields
    ///
    /// A key field missing from the record contributes a NULL value; the
    /// enforced-numeric comparator rejects such keys downstream.
    pub fn extract_key(&self, key_fields: &[String]) -> Key {
        let pairs = key_fields
            .iter()
            .map(|field| (field.clone(), self.get(field).cloned().flatten()))
            .collect();
        Record { pairs }
    }
}

impl std::fmt::Display for Record {
    /// Compact `{field=value, ...}` rendering for diagnostics
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(bytes) => write!(f, "{}={}", name, String::from_utf8_lossy(bytes))?,
                None => write!(f, "{}=NULL", name)?,
            }
        }
        write!(f, "}}")
    }
}
