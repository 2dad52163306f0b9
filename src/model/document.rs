//! Document-level types.

use super::PageText;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text view of a source PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path the document was loaded from
    pub path: PathBuf,

    /// Pages in document order
    pub pages: Vec<PageText>,
}

impl Document {
    /// Create a document with no pages.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: Vec::new(),
        }
    }

    /// Create a document from a list of page texts, numbering pages from 1.
    pub fn from_texts<I, S>(path: impl Into<PathBuf>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i as u32 + 1, text))
            .collect();
        Self {
            path: path.into(),
            pages,
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension; names the document's output folders.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageText) {
        self.pages.push(page);
    }

    /// Whether no page carries any text.
    pub fn has_no_text(&self) -> bool {
        self.pages.iter().all(PageText::is_blank)
    }
}
