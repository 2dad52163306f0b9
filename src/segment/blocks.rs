//! Text block extraction.
//!
//! Sentences are accumulated into a block until a heading-like sentence
//! shows up; the heading then opens the next block. Blank pages are skipped
//! without touching the accumulator.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::heading::is_heading;
use super::sentence::{PunctuationSplitter, SentenceSplitter};
use crate::error::Result;
use crate::model::{Document, PageText, TextBlock};

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Options for grouping sentences into blocks.
#[derive(Debug, Clone)]
pub struct BlockOptions {
    /// Close the open block at the end of every page
    pub page_break_ends_block: bool,

    /// Apply Unicode NFC before whitespace collapsing
    pub normalize_unicode: bool,
}

impl BlockOptions {
    /// Create new block options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether a page break closes the open block.
    pub fn with_page_break_ends_block(mut self, ends: bool) -> Self {
        self.page_break_ends_block = ends;
        self
    }

    /// Let blocks continue across page breaks.
    pub fn join_pages(mut self) -> Self {
        self.page_break_ends_block = false;
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            page_break_ends_block: true,
            normalize_unicode: true,
        }
    }
}

/// Groups a document's sentences into [`TextBlock`]s.
pub struct BlockExtractor {
    splitter: Box<dyn SentenceSplitter>,
    options: BlockOptions,
}

impl BlockExtractor {
    /// Create an extractor using the punctuation splitter.
    pub fn new(options: BlockOptions) -> Self {
        Self::with_splitter(Box::new(PunctuationSplitter::new()), options)
    }

    /// Create an extractor with a custom sentence splitter.
    pub fn with_splitter(splitter: Box<dyn SentenceSplitter>, options: BlockOptions) -> Self {
        Self { splitter, options }
    }

    /// Extraction options in use.
    pub fn options(&self) -> &BlockOptions {
        &self.options
    }

    /// Extract the blocks of a whole document.
    pub fn extract(&self, document: &Document) -> Vec<TextBlock> {
        self.extract_pages(&document.pages)
    }

    /// Extract blocks from pages in the given order.
    ///
    /// The result is numbered from 1 with no gaps and never contains an
    /// empty block. Pages without text yield nothing.
    pub fn extract_pages(&self, pages: &[PageText]) -> Vec<TextBlock> {
        let mut pending = Pending::default();

        for page in pages.iter().filter(|page| !page.is_blank()) {
            for sentence in self.splitter.split(&page.text) {
                if pending.is_empty() || is_heading(sentence) {
                    pending.flush();
                    pending.page = page.number;
                }
                pending.sentences.push(sentence);
            }

            if self.options.page_break_ends_block {
                pending.flush();
            }
        }
        pending.flush();

        pending
            .done
            .into_iter()
            .filter_map(|(page, raw)| {
                let content = self.normalize(&raw);
                (!content.is_empty()).then_some((page, content))
            })
            .enumerate()
            .map(|(i, (first_page, content))| TextBlock {
                index: i + 1,
                first_page,
                content,
            })
            .collect()
    }

    /// Collapse whitespace runs to one space and trim.
    pub fn normalize(&self, text: &str) -> String {
        let text = if self.options.normalize_unicode {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };
        WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
    }
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new(BlockOptions::default())
    }
}

/// Sentences of the open block plus the blocks already closed.
#[derive(Default)]
struct Pending<'a> {
    page: u32,
    sentences: Vec<&'a str>,
    done: Vec<(u32, String)>,
}

impl Pending<'_> {
    fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    fn flush(&mut self) {
        if !self.sentences.is_empty() {
            self.done.push((self.page, self.sentences.join(" ")));
            self.sentences.clear();
        }
    }
}

/// Write each block to `dir/block_NNN.txt` as bare UTF-8.
pub fn write_blocks(blocks: &[TextBlock], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(blocks.len());
    for block in blocks {
        let path = dir.join(block.file_name());
        fs::write(&path, block.content.as_bytes())?;
        written.push(path);
    }
    Ok(written)
}
