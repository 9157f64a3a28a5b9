//! Configuration options for variable resolution

use serde::Deserialize;

/// Default top-level key holding the variables section
pub const DEFAULT_VARIABLE_KEY: &str = "$vars";
/// Default path segment separator
pub const DEFAULT_DELIMITER: &str = ".";
/// Default maximum reference-chain length per lookup
pub const DEFAULT_MAX_RECURSION: usize = 1024;

/// Configuration options for the parser
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Top-level key holding the variables section
    pub variable_key: String,
    /// Path segment separator, used in references and in output paths
    pub delimiter: String,
    /// Maximum reference hops per lookup before failing
    pub max_recursion: usize,
    /// Re-emit the variables section in the output
    pub keep_vars: bool,
    /// Key under which the variables section is re-emitted
    pub emitted_name: String,
}

impl Options {
    /// Creates options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key of the variables section
    pub fn with_variable_key(mut self, key: impl Into<String>) -> Self {
        self.variable_key = key.into();
        self
    }

    /// Sets the path delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the maximum number of reference hops per lookup
    pub fn with_max_recursion(mut self, max_recursion: usize) -> Self {
        self.max_recursion = max_recursion;
        self
    }

    /// Sets whether the variables section is kept in the output
    pub fn with_keep_vars(mut self, keep: bool) -> Self {
        self.keep_vars = keep;
        self
    }

    /// Sets the key used when re-emitting the variables section
    pub fn with_emitted_name(mut self, name: impl Into<String>) -> Self {
        self.emitted_name = name.into();
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            variable_key: DEFAULT_VARIABLE_KEY.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            max_recursion: DEFAULT_MAX_RECURSION,
            keep_vars: false,
            emitted_name: DEFAULT_VARIABLE_KEY.to_string(),
        }
    }
}
