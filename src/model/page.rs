//! Page-level types.

use serde::{Deserialize, Serialize};

/// Extracted text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,

    /// Raw text as produced by the text backend
    pub text: String,
}

impl PageText {
    /// Create a page with the given number and text.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Create a page that carries no text.
    pub fn empty(number: u32) -> Self {
        Self::new(number, String::new())
    }

    /// Whether the page has no text other than whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_page() {
        assert!(PageText::empty(1).is_blank());
        assert!(PageText::new(2, " \n\t\u{3000}").is_blank());
        assert!(!PageText::new(3, "第一章").is_blank());
    }
}
