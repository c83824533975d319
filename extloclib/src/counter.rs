//! Per-extension line counters.
//!
//! An [`ExtensionCounter`] accumulates blank, non-blank and deprecation
//! counts for every file sharing an extension. Counters are identified by
//! their key alone, so two counters with the same key are the same bucket
//! regardless of their counts.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::AddAssign;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::classify::classify;
use crate::error::Error;
use crate::Result;

/// Key of the synthetic counter that merges every extension.
pub const GRAND_TOTAL_KEY: &str = ".*";

/// Line counts for one extension key.
#[derive(Debug, Clone)]
pub struct ExtensionCounter {
    key: String,
    blank: u64,
    non_blank: u64,
    markers: u64,
}

impl ExtensionCounter {
    /// Create an empty counter for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            blank: 0,
            non_blank: 0,
            markers: 0,
        }
    }

    /// Create an empty counter, rejecting an absent key.
    ///
    /// Every counter needs a grouping identity; `None` yields
    /// [`Error::MissingKey`].
    pub fn create(key: Option<&str>) -> Result<Self> {
        key.map(Self::new).ok_or(Error::MissingKey)
    }

    /// Create the empty grand-total counter.
    pub fn grand_total() -> Self {
        Self::new(GRAND_TOTAL_KEY)
    }

    /// The extension key, including its leading dot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whitespace-only lines
    pub fn blank(&self) -> u64 {
        self.blank
    }

    /// Lines with at least one non-whitespace character
    pub fn non_blank(&self) -> u64 {
        self.non_blank
    }

    /// Non-blank lines containing the deprecation marker
    pub fn markers(&self) -> u64 {
        self.markers
    }

    /// All recorded lines
    pub fn total(&self) -> u64 {
        self.blank + self.non_blank
    }

    /// The `(blank, non_blank, markers)` triple, for comparing counts
    /// independently of the key.
    pub fn counts(&self) -> (u64, u64, u64) {
        (self.blank, self.non_blank, self.markers)
    }

    /// Record one line.
    pub fn record(&mut self, line: &str) {
        let class = classify(line);
        if class.is_blank {
            self.blank += 1;
        } else {
            self.non_blank += 1;
            if class.has_marker {
                self.markers += 1;
            }
        }
    }

    /// Add the counts of `other` into this counter.
    ///
    /// Keys are not compared: this is how the grand total collects every
    /// extension under its own key.
    pub fn merge_from(&mut self, other: &ExtensionCounter) -> &mut Self {
        self.blank += other.blank;
        self.non_blank += other.non_blank;
        self.markers += other.markers;
        self
    }

    /// Render the fixed-format summary block.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for ExtensionCounter {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ExtensionCounter {}

impl Hash for ExtensionCounter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl AddAssign<&ExtensionCounter> for ExtensionCounter {
    fn add_assign(&mut self, other: &ExtensionCounter) {
        self.merge_from(other);
    }
}

impl fmt::Display for ExtensionCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counts for files [*{}] :", self.key)?;
        writeln!(f, "{} empty lines", self.blank)?;
        writeln!(f, "{} not empty lines", self.non_blank)?;
        writeln!(f, "{} total lines", self.total())?;
        writeln!(f, "{} deprecations", self.markers)
    }
}

impl Serialize for ExtensionCounter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExtensionCounter", 5)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("blank", &self.blank)?;
        state.serialize_field("non_blank", &self.non_blank)?;
        state.serialize_field("total", &self.total())?;
        state.serialize_field("deprecations", &self.markers)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn counter_with(key: &str, lines: &[&str]) -> ExtensionCounter {
        let mut counter = ExtensionCounter::new(key);
        for line in lines {
            counter.record(line);
        }
        counter
    }

    #[test]
    fn test_create_requires_key() {
        assert!(matches!(
            ExtensionCounter::create(None),
            Err(Error::MissingKey)
        ));

        let counter = ExtensionCounter::create(Some(".kt")).unwrap();
        assert_eq!(counter.key(), ".kt");
        assert_eq!(counter.counts(), (0, 0, 0));
    }

    #[test]
    fn test_empty_key_is_a_valid_key() {
        let counter = ExtensionCounter::create(Some("")).unwrap();
        assert_eq!(counter.key(), "");
    }

    #[test]
    fn test_record() {
        let counter = counter_with(
            ".kt",
            &["class A {", "", "   ", "  @Deprecated", "  fun f() = 1", "}"],
        );

        assert_eq!(counter.blank(), 2);
        assert_eq!(counter.non_blank(), 4);
        assert_eq!(counter.markers(), 1);
        assert_eq!(counter.total(), 6);
    }

    #[test]
    fn test_marker_on_blank_line_is_impossible() {
        let counter = counter_with(".kt", &["", " ", "\t"]);
        assert_eq!(counter.markers(), 0);
        assert!(counter.markers() <= counter.non_blank());
    }

    #[test]
    fn test_invariants_hold_while_recording() {
        let lines = ["a", "", "@Deprecated", " ", "@Deprecated @Deprecated", "b"];
        let mut counter = ExtensionCounter::new(".java");
        let mut previous = counter.counts();

        for line in lines {
            counter.record(line);
            let current = counter.counts();
            assert!(current.0 >= previous.0);
            assert!(current.1 >= previous.1);
            assert!(current.2 >= previous.2);
            assert_eq!(counter.total(), counter.blank() + counter.non_blank());
            assert!(counter.total() >= counter.blank());
            assert!(counter.total() >= counter.non_blank());
            assert!(counter.markers() <= counter.non_blank());
            previous = current;
        }

        // Several markers on one line still count once
        assert_eq!(counter.markers(), 2);
    }

    #[test]
    fn test_merge_returns_self_for_folding() {
        let a = counter_with(".kt", &["a", ""]);
        let b = counter_with(".md", &["@Deprecated"]);

        let mut total = ExtensionCounter::grand_total();
        total.merge_from(&a).merge_from(&b);

        assert_eq!(total.key(), GRAND_TOTAL_KEY);
        assert_eq!(total.counts(), (1, 2, 1));
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = counter_with(".kt", &["a", "", "@Deprecated"]);
        let b = counter_with(".md", &["", "", "text"]);

        let mut ab = ExtensionCounter::grand_total();
        ab.merge_from(&a).merge_from(&b);
        let mut ba = ExtensionCounter::grand_total();
        ba.merge_from(&b).merge_from(&a);

        assert_eq!(ab.counts(), ba.counts());
    }

    #[test]
    fn test_merge_is_associative() {
        let a = counter_with(".a", &["x", ""]);
        let b = counter_with(".b", &["@Deprecated"]);
        let c = counter_with(".c", &["", "", "y"]);

        let mut left = a.clone();
        left.merge_from(&b).merge_from(&c);

        let mut bc = b.clone();
        bc.merge_from(&c);
        let mut right = a.clone();
        right.merge_from(&bc);

        assert_eq!(left.counts(), right.counts());
    }

    #[test]
    fn test_add_assign_merges() {
        let mut total = ExtensionCounter::grand_total();
        total += &counter_with(".kt", &["a"]);
        total += &counter_with(".kt", &[""]);
        assert_eq!(total.counts(), (1, 1, 0));
    }

    #[test]
    fn test_equality_by_key_only() {
        let a = counter_with(".kt", &["a"]);
        let b = ExtensionCounter::new(".kt");
        let upper = ExtensionCounter::new(".KT");
        let bare = ExtensionCounter::new("kt");

        assert_eq!(a, b);
        assert_ne!(a, upper);
        assert_ne!(a, bare);

        let set: HashSet<ExtensionCounter> = [a, b, upper, bare].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_describe_format() {
        let counter = counter_with(".kt", &["a", "", "@Deprecated", "b"]);

        assert_eq!(
            counter.describe(),
            "Counts for files [*.kt] :\n\
             1 empty lines\n\
             3 not empty lines\n\
             4 total lines\n\
             1 deprecations\n"
        );
    }

    #[test]
    fn test_describe_grand_total() {
        let text = ExtensionCounter::grand_total().describe();
        assert!(text.starts_with("Counts for files [*.*] :\n"));
    }

    #[test]
    fn test_serialize_includes_total() {
        let counter = counter_with(".md", &["", "x"]);
        let value = serde_json::to_value(&counter).unwrap();

        assert_eq!(value["key"], ".md");
        assert_eq!(value["blank"], 1);
        assert_eq!(value["non_blank"], 1);
        assert_eq!(value["total"], 2);
        assert_eq!(value["deprecations"], 0);
    }
}
