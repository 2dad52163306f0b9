//! Extracted page image type.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A rendered page that passed the blank-page filter and was written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// Page ordinal in the full document (1-indexed)
    pub page: u32,

    /// Grayscale pixel-intensity variance of the rendering
    pub variance: f64,

    /// Where the PNG was written
    pub path: PathBuf,
}

/// `image_001.png`, named after the page ordinal so skipped pages leave gaps.
pub fn image_file_name(page: u32) -> String {
    format!("image_{:03}.png", page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_name_uses_page_ordinal() {
        assert_eq!(image_file_name(1), "image_001.png");
        assert_eq!(image_file_name(3), "image_003.png");
        assert_eq!(image_file_name(1000), "image_1000.png");
    }
}
