//! # extloclib
//!
//! A lines of code counter library that groups results by file extension.
//!
//! ## Overview
//!
//! Every regular file under a root path is decoded with a configurable
//! encoding and read line by line. Each line is classified as:
//!
//! - **Blank**: whitespace only, including empty lines
//! - **Not empty**: anything else
//! - **Deprecation**: a non-blank line containing `@Deprecated`
//!
//! Counts are accumulated per extension key (`.kt`, `.java`, `""` for files
//! without a dot). When more than one extension is found, a grand total
//! under the key `.*` closes the report.
//!
//! ## Features
//!
//! - **Streaming**: files are read lazily, one open file at a time
//! - **Any encoding**: labels such as `UTF-8`, `UTF-16LE` or `windows-1251`
//! - **Error isolation**: an unreadable file is reported and skipped, the
//!   rest of the tree is still counted
//! - **Pluggable output**: reports go to a [`ReportSink`]
//!
//! ## Example
//!
//! ```rust
//! use extloclib::{count_tree, CollectingSink, CountOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("App.kt"), "@Deprecated\nfun main() {}\n\n").unwrap();
//! fs::write(dir.path().join("README.md"), "# App\n").unwrap();
//!
//! let mut sink = CollectingSink::new();
//! let report = count_tree(dir.path(), &CountOptions::new(), &mut sink).unwrap();
//!
//! let kt = report.get(".kt").unwrap();
//! assert_eq!(kt.blank(), 1);
//! assert_eq!(kt.non_blank(), 2);
//! assert_eq!(kt.markers(), 1);
//!
//! let total = report.grand_total().unwrap();
//! assert_eq!(total.total(), 4);
//! ```

pub mod classify;
pub mod counter;
pub mod error;
pub mod lines;
pub mod options;
pub mod report;
pub mod walker;

pub use classify::{classify, LineClass, DEPRECATION_MARKER};
pub use counter::{ExtensionCounter, GRAND_TOTAL_KEY};
pub use error::Error;
pub use lines::{lines, resolve_encoding, Lines};
pub use options::{CountOptions, DEFAULT_ENCODING};
pub use report::{
    count_tree, extension_of, failure_message, run, CollectingSink, Report, ReportSink,
    TracingSink,
};
pub use walker::{walk, WalkSummary};

/// Result type for extloclib operations
pub type Result<T> = std::result::Result<T, Error>;
