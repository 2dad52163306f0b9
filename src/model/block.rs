//! Text block type.

use serde::{Deserialize, Serialize};

/// A run of sentences written out as one `block_NNN.txt` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Position within the document (1-indexed, contiguous)
    pub index: usize,

    /// Page the block's first sentence came from
    pub first_page: u32,

    /// Sentences joined by single spaces, never empty
    pub content: String,
}

impl TextBlock {
    /// Output file name for this block.
    pub fn file_name(&self) -> String {
        block_file_name(self.index)
    }
}

/// `block_001.txt`, `block_002.txt`, ... (at least three digits).
pub fn block_file_name(index: usize) -> String {
    format!("block_{:03}.txt", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_file_name_padding() {
        assert_eq!(block_file_name(1), "block_001.txt");
        assert_eq!(block_file_name(42), "block_042.txt");
        assert_eq!(block_file_name(1234), "block_1234.txt");
    }
}
