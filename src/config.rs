//! Configuration for snapdelta
//!
//! Describes the shape of one table's dumps: the field schema, the key
//! fields that identify a record, and how actions should be serialized.

/// Configuration for one delta calculation
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Dataset Schema
    // -------------------------------------------------------------------------
    /// Ordered field names of the input dumps
    pub fields: Vec<String>,

    /// Ordered subset of fields that identify a record
    pub key_fields: Vec<String>,

    // -------------------------------------------------------------------------
    // Comparison Configuration
    // -------------------------------------------------------------------------
    /// Require key values to be numeric; when false, non-numeric keys are
    /// compared lexicographically
    pub enforce_numeric_keys: bool,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Table name used in generated statements
    pub table: String,

    /// Add the IGNORE keyword to INSERT and UPDATE statements
    pub use_ignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            key_fields: Vec::new(),
            enforce_numeric_keys: true,
            table: String::new(),
            use_ignore: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the ordered field names of the input dumps
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.config.fields = fields;
        self
    }

    /// Set the ordered key field names
    pub fn key_fields(mut self, key_fields: Vec<String>) -> Self {
        self.config.key_fields = key_fields;
        self
    }

    /// Toggle numeric key enforcement
    pub fn enforce_numeric_keys(mut self, enforce: bool) -> Self {
        self.config.enforce_numeric_keys = enforce;
        self
    }

    /// Set the table name used in generated statements
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.config.table = table.into();
        self
    }

    /// Toggle the IGNORE keyword on generated statements
    pub fn use_ignore(mut self, use_ignore: bool) -> Self {
        self.config.use_ignore = use_ignore;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
