//! SQL serialization of delta actions
//!
//! Renders insert/update/delete actions as MySQL statements for an
//! incremental-load script. Values are escaped with a MySQL string-literal
//! escape routine (quotes, backslash, NUL, newline, carriage return,
//! ctrl-Z); NULL values render as the SQL NULL keyword.

use crate::error::{DeltaError, Result};
use crate::record::{Key, Record};

/// Serialization of delta actions into statement strings
pub trait DeltaSerializer {
    fn serialize_insert(&self, record: &Record) -> Result<String>;

    fn serialize_update(&self, key: &Key, changed: &Record) -> Result<String>;

    fn serialize_delete(&self, key: &Key) -> Result<String>;
}

/// Serializer that generates MySQL-flavored SQL statements
#[derive(Debug, Clone)]
pub struct MysqlDeltaSerializer {
    table: String,
    use_ignore: bool,
}

impl MysqlDeltaSerializer {
    pub fn new(table: impl Into<String>) -> Self {
        MysqlDeltaSerializer {
            table: table.into(),
            use_ignore: false,
        }
    }

    /// Add the IGNORE keyword to INSERT and UPDATE statements
    pub fn set_use_ignore(&mut self, use_ignore: bool) {
        self.use_ignore = use_ignore;
    }

    fn ignore_keyword(&self) -> &'static str {
        if self.use_ignore {
            "IGNORE "
        } else {
            ""
        }
    }

    /// Construct a `field=value` assignment list joined with `glue`
    fn assignments(&self, values: &Record, glue: &str) -> Result<String> {
        if values.is_empty() {
            return Err(DeltaError::EmptyValueSet {
                table: self.table.clone(),
            });
        }
        let parts: Vec<String> = values
            .fields()
            .map(|(field, value)| match value {
                Some(bytes) => format!("{}='{}'", field, escape_sql(bytes)),
                None => format!("{}=NULL", field),
            })
            .collect();
        Ok(parts.join(glue))
    }
}

impl DeltaSerializer for MysqlDeltaSerializer {
    fn serialize_insert(&self, record: &Record) -> Result<String> {
        Ok(format!(
            "INSERT {}INTO {} SET {};\n",
            self.ignore_keyword(),
            self.table,
            self.assignments(record, ",")?
        ))
    }

    fn serialize_update(&self, key: &Key, changed: &Record) -> Result<String> {
        Ok(format!(
            "UPDATE {}{} SET {} WHERE {};\n",
            self.ignore_keyword(),
            self.table,
            self.assignments(changed, ",")?,
            self.assignments(key, " AND ")?
        ))
    }

    fn serialize_delete(&self, key: &Key) -> Result<String> {
        Ok(format!(
            "DELETE FROM {} WHERE {};\n",
            self.table,
            self.assignments(key, " AND ")?
        ))
    }
}

/// Escape a byte string for embedding in a single-quoted MySQL literal
///
/// Follows the character set of mysql_real_escape_string; invalid UTF-8 is
/// replaced during the final conversion.
fn escape_sql(bytes: &[u8]) -> String {
    let mut escaped = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            0x00 => escaped.extend_from_slice(b"\\0"),
            b'\'' => escaped.extend_from_slice(b"\\'"),
            b'"' => escaped.extend_from_slice(b"\\\""),
            0x08 => escaped.extend_from_slice(b"\\b"),
            b'\n' => escaped.extend_from_slice(b"\\n"),
            b'\r' => escaped.extend_from_slice(b"\\r"),
            0x1A => escaped.extend_from_slice(b"\\Z"),
            b'\\' => escaped.extend_from_slice(b"\\\\"),
            other => escaped.push(other),
        }
    }
    String::from_utf8_lossy(&escaped).into_owned()
}
