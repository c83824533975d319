//! Per-extension report: traversal, aggregation and rendering.
//!
//! [`count_tree`] walks a source tree and fills a [`Report`] with one
//! [`ExtensionCounter`] per extension key. [`run`] does the same and emits
//! the rendered blocks to a [`ReportSink`], ending with a grand total when
//! more than one extension was seen.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{error, info};

use crate::counter::ExtensionCounter;
use crate::error::Error;
use crate::lines::{lines, resolve_encoding};
use crate::options::CountOptions;
use crate::walker::walk;
use crate::Result;

/// Receives the rendered report and any diagnostics.
pub trait ReportSink {
    /// One rendered counter block.
    fn block(&mut self, text: &str);

    /// A problem with the run or with one file.
    fn diagnostic(&mut self, message: &str);
}

/// Sends blocks to `tracing` at info level and diagnostics at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn block(&mut self, text: &str) {
        info!("{}", text);
    }

    fn diagnostic(&mut self, message: &str) {
        error!("{}", message);
    }
}

/// Keeps everything it receives in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub blocks: Vec<String>,
    pub diagnostics: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for CollectingSink {
    fn block(&mut self, text: &str) {
        self.blocks.push(text.to_string());
    }

    fn diagnostic(&mut self, message: &str) {
        self.diagnostics.push(message.to_string());
    }
}

/// Extension key of a file: its name from the last `.` on, or `""`.
///
/// `archive.tar.gz` gives `.gz`, `Makefile` gives `""`, `.gitignore` gives
/// `.gitignore`.
pub fn extension_of(path: impl AsRef<Path>) -> String {
    let Some(name) = path.as_ref().file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();

    match name.rfind('.') {
        Some(dot) => name[dot..].to_string(),
        None => String::new(),
    }
}

/// Counters of one run, keyed by extension.
///
/// Iteration follows the sorted key order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    counters: BTreeMap<String, ExtensionCounter>,
    skipped: Vec<PathBuf>,
    files_visited: u64,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters in display order.
    pub fn counters(&self) -> impl Iterator<Item = &ExtensionCounter> {
        self.counters.values()
    }

    /// The counter for an extension key, if any file had it.
    pub fn get(&self, key: &str) -> Option<&ExtensionCounter> {
        self.counters.get(key)
    }

    /// Number of distinct extension keys.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Files whose content was left out because they could not be read.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Regular files found during traversal, readable or not.
    pub fn files_visited(&self) -> u64 {
        self.files_visited
    }

    /// All counters merged under the grand-total key.
    ///
    /// Only present when more than one extension was seen.
    pub fn grand_total(&self) -> Option<ExtensionCounter> {
        if self.counters.len() <= 1 {
            return None;
        }

        let mut total = ExtensionCounter::grand_total();
        for counter in self.counters.values() {
            total.merge_from(counter);
        }
        Some(total)
    }

    /// Rendered blocks: one per extension, then the grand total if any.
    pub fn blocks(&self) -> Vec<String> {
        self.counters
            .values()
            .map(ExtensionCounter::describe)
            .chain(self.grand_total().map(|t| t.describe()))
            .collect()
    }

    /// Send every block to `sink`.
    pub fn emit(&self, sink: &mut dyn ReportSink) {
        for block in self.blocks() {
            sink.block(&block);
        }
    }

    /// Count one file into the counter of its extension.
    ///
    /// The key is registered even when the file is empty or unreadable. A
    /// file that fails part way contributes nothing.
    fn count_file(&mut self, path: &Path, encoding: &str, sink: &mut dyn ReportSink) -> Result<()> {
        let counter = self
            .counters
            .entry(extension_of(path))
            .or_insert_with_key(|key| ExtensionCounter::new(key.as_str()));

        match read_file(path, counter.key(), encoding) {
            Ok(file_counter) => {
                counter.merge_from(&file_counter);
                Ok(())
            }
            Err(e) if e.is_per_file() => {
                sink.diagnostic(&format!(
                    "Error while reading source file [{}]: {}",
                    path.display(),
                    e
                ));
                self.skipped.push(path.to_path_buf());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let extensions: Vec<&ExtensionCounter> = self.counters.values().collect();

        let mut state = serializer.serialize_struct("Report", 4)?;
        state.serialize_field("extensions", &extensions)?;
        state.serialize_field("total", &self.grand_total())?;
        state.serialize_field("skipped", &self.skipped)?;
        state.serialize_field("files_visited", &self.files_visited)?;
        state.end()
    }
}

/// Stream one file into a fresh counter.
fn read_file(path: &Path, key: &str, encoding: &str) -> Result<ExtensionCounter> {
    let mut counter = ExtensionCounter::new(key);
    for line in lines(path, encoding)? {
        counter.record(&line?);
    }
    Ok(counter)
}

/// Count every file under `root`, grouped by extension.
///
/// Fails before traversal when `root` does not exist or the encoding label
/// is unknown, and when `root` itself cannot be listed. Files that cannot be
/// read are reported to `sink` and listed in [`Report::skipped`].
pub fn count_tree(
    root: impl AsRef<Path>,
    options: &CountOptions,
    sink: &mut dyn ReportSink,
) -> Result<Report> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(Error::PathNotFound(root.to_path_buf()));
    }
    resolve_encoding(&options.encoding)?;

    let mut report = Report::new();
    let summary = walk(root, |file| {
        report.count_file(file, &options.encoding, &mut *sink)
    })?;
    report.files_visited = summary.files;

    Ok(report)
}

/// Count `root` and emit the report to `sink`.
///
/// When the run cannot start, `sink` gets exactly one diagnostic, no
/// blocks are emitted, and `None` is returned.
pub fn run(
    root: impl AsRef<Path>,
    options: &CountOptions,
    sink: &mut dyn ReportSink,
) -> Option<Report> {
    match count_tree(root, options, sink) {
        Ok(report) => {
            report.emit(sink);
            Some(report)
        }
        Err(e) => {
            sink.diagnostic(&failure_message(&e));
            None
        }
    }
}

/// Diagnostic for a run that could not start.
pub fn failure_message(error: &Error) -> String {
    match error {
        Error::PathNotFound(path) => {
            format!("Source directory \"{}\" is not valid.", path.display())
        }
        other => other.to_string(),
    }
}
