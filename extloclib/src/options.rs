//! Options for a counting run.

/// Encoding used when none is configured.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Options for counting lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountOptions {
    /// Label of the encoding source files are decoded with
    pub encoding: String,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl CountOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source encoding (`"UTF-8"`, `"windows-1251"`, ...).
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }
}
