//! Sentence segmentation and heading-driven text blocks.

mod blocks;
mod heading;
mod sentence;

pub use blocks::{write_blocks, BlockExtractor, BlockOptions};
pub use heading::{classify, is_heading, HeadingRule, MAX_HEADING_CHARS};
pub use sentence::{PunctuationSplitter, SentenceSplitter};
