//! Heading classifier.
//!
//! A sentence that looks like a heading opens a new text block. The rules
//! form a small decision table evaluated top to bottom, first match wins:
//!
//! | # | condition                                  | result      |
//! |---|--------------------------------------------|-------------|
//! | 1 | 50 or more characters                      | not heading |
//! | 2 | starts with a digit/dot run (`1.`, `2.3.`) | heading     |
//! | 3 | all cased characters are upper-case        | heading     |
//! | 4 | ends with `:`, `：` or `。`                | heading     |
//! | 5 | anything else                              | not heading |

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences this long (in characters) are never headings.
pub const MAX_HEADING_CHARS: usize = 50;

static NUMBERED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d.]+").expect("numbered prefix pattern"));

/// Which rule flagged a sentence as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingRule {
    /// Leading section number such as `1.` or `2.3.`
    NumberedPrefix,
    /// Every cased character is upper-case
    AllCaps,
    /// Trailing ASCII colon, full-width colon or CJK full stop
    TrailingMark,
}

/// Classify a sentence, returning the rule that marked it as a heading.
pub fn classify(text: &str) -> Option<HeadingRule> {
    let text = text.trim();

    if text.chars().count() >= MAX_HEADING_CHARS {
        return None;
    }
    if NUMBERED_PREFIX.is_match(text) {
        return Some(HeadingRule::NumberedPrefix);
    }
    if is_all_caps(text) {
        return Some(HeadingRule::AllCaps);
    }
    if text.ends_with(&[':', '：', '。'][..]) {
        return Some(HeadingRule::TrailingMark);
    }
    None
}

/// Whether a sentence likely starts a new logical block.
pub fn is_heading(text: &str) -> bool {
    classify(text).is_some()
}

/// At least one cased character, and none of them lower-case.
fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_prefix() {
        assert_eq!(classify("1. 总则"), Some(HeadingRule::NumberedPrefix));
        assert_eq!(classify("2.3.1 适用范围"), Some(HeadingRule::NumberedPrefix));
        assert_eq!(classify("12"), Some(HeadingRule::NumberedPrefix));
        assert!(is_heading("  3. Scope  "));
    }

    #[test]
    fn test_numeric_prefixes_are_headings() {
        for text in ["1", "1.2", "10.20.30", "7.1 the rest of the line is lower"] {
            assert!(is_heading(text), "{text:?} should be a heading");
        }
    }

    #[test]
    fn test_all_caps() {
        assert_eq!(classify("INTRODUCTION"), Some(HeadingRule::AllCaps));
        assert_eq!(classify("PART II - RESULTS"), Some(HeadingRule::AllCaps));
        assert!(!is_heading("Introduction"));
        // No cased characters at all.
        assert_eq!(classify("用药说明"), None);
    }

    #[test]
    fn test_trailing_mark() {
        assert_eq!(classify("注意事项："), Some(HeadingRule::TrailingMark));
        assert_eq!(classify("Dosage:"), Some(HeadingRule::TrailingMark));
        assert_eq!(classify("每日三次。"), Some(HeadingRule::TrailingMark));
        assert!(!is_heading("Take with water."));
    }

    #[test]
    fn test_long_sentences_are_never_headings() {
        let numbered = format!("1. {}", "x".repeat(47));
        assert_eq!(numbered.chars().count(), 50);
        assert!(!is_heading(&numbered));

        let shouting = "A".repeat(50);
        assert!(!is_heading(&shouting));

        let cjk = format!("{}：", "说".repeat(49));
        assert!(!is_heading(&cjk));

        let just_under = format!("{}:", "a".repeat(48));
        assert!(is_heading(&just_under));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 20 CJK characters are 60 bytes but well under the limit.
        let text = format!("{}：", "药".repeat(20));
        assert!(text.len() > MAX_HEADING_CHARS);
        assert!(is_heading(&text));
    }

    #[test]
    fn test_plain_sentence() {
        assert!(!is_heading("This is a regular sentence"));
        assert!(!is_heading(""));
    }
}
