//! Line classification.
//!
//! A line is either blank (whitespace only, including the empty string) or
//! non-blank. Non-blank lines are additionally checked for the deprecation
//! marker.

/// Substring that flags a line as deprecated code.
pub const DEPRECATION_MARKER: &str = "@Deprecated";

/// Classification of a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClass {
    /// The line holds nothing but whitespace
    pub is_blank: bool,
    /// The line is non-blank and contains [`DEPRECATION_MARKER`]
    pub has_marker: bool,
}

/// Classify a line of text.
///
/// The marker match is case-sensitive and has no word-boundary check, so
/// `@DeprecatedSince` also counts.
pub fn classify(line: &str) -> LineClass {
    let is_blank = line.chars().all(char::is_whitespace);

    LineClass {
        is_blank,
        has_marker: !is_blank && line.contains(DEPRECATION_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_is_blank() {
        assert_eq!(
            classify(""),
            LineClass {
                is_blank: true,
                has_marker: false
            }
        );
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        for line in ["   ", "\t", " \t  ", "\u{00a0}", "\u{2003}\u{3000}"] {
            assert!(classify(line).is_blank, "{line:?} should be blank");
        }
    }

    #[test]
    fn test_any_visible_char_is_non_blank() {
        for line in ["x", "  }", "\t// comment", ".", "  a  "] {
            assert!(!classify(line).is_blank, "{line:?} should not be blank");
        }
    }

    #[test]
    fn test_marker_detection() {
        assert!(classify("@Deprecated").has_marker);
        assert!(classify("    @Deprecated(\"use bar\")").has_marker);
        assert!(classify("fun foo() // @DeprecatedSince 2.0").has_marker);
        assert!(!classify("@deprecated").has_marker);
        assert!(!classify("Deprecated").has_marker);
        assert!(!classify("fun foo()").has_marker);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for line in ["", "  ", "@Deprecated", "code", " @Deprecated "] {
            assert_eq!(classify(line), classify(line));
        }
    }
}
