//! # pdfsift
//!
//! Batch PDF sifting for Rust.
//!
//! Walks a directory of PDFs and, for every document, writes
//!
//! - **text blocks**: page text split into sentences and grouped into
//!   blocks that start at heading-like sentences, one `block_NNN.txt` each;
//! - **page images**: every page rendered to PNG, skipping pages that a
//!   pixel-variance heuristic judges blank.
//!
//! A small OCR toolkit ([`ocr`]) sends directories of images to the Baidu
//! OCR service and checks credentials.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use pdfsift::{process_directory, PipelineOptions};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let summary = process_directory(
//!         Path::new("input_dir"),
//!         Path::new("output_dir"),
//!         PipelineOptions::default(),
//!     )?;
//!     println!(
//!         "{} documents, {} blocks, {} images",
//!         summary.documents.len(),
//!         summary.total_blocks(),
//!         summary.total_images()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Rendering needs the Pdfium shared library at runtime. Without it every
//! document still gets its text blocks and reports a rendering error.

pub mod detect;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod raster;
pub mod segment;
pub mod walk;

// Re-export commonly used types
pub use detect::{has_extension, is_image_path, parse_pdf_header, read_pdf_header, PdfHeader};
pub use error::{Error, Result};
pub use model::{Document, ExtractedImage, PageText, TextBlock};
pub use parser::{LopdfSource, TextSource};
pub use raster::{
    extract_images, is_meaningful, pixel_variance, ImageReport, PageRenderer, PdfiumRenderer,
    RenderOptions, RenderedPage, BLANK_VARIANCE_THRESHOLD,
};
pub use segment::{
    is_heading, write_blocks, BlockExtractor, BlockOptions, PunctuationSplitter, SentenceSplitter,
};
pub use walk::{
    DocumentOutcome, DocumentReport, DocumentResult, OutputLayout, Pipeline, PipelineOptions,
    ProgressEvent, RunSummary,
};

use std::path::Path;

/// Process every PDF under `input_dir` with the default backends.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pdfsift::{process_directory, PipelineOptions};
///
/// let summary = process_directory(
///     Path::new("input_dir"),
///     Path::new("output_dir"),
///     PipelineOptions::default(),
/// ).unwrap();
/// assert_eq!(summary.failed(), 0);
/// ```
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: PipelineOptions,
) -> Result<RunSummary> {
    Pipeline::with_default_backends(options).run(input_dir, output_dir)
}

/// Extract the text blocks of a single PDF without writing anything.
///
/// # Example
///
/// ```no_run
/// let blocks = pdfsift::extract_text_blocks("document.pdf").unwrap();
/// for block in &blocks {
///     println!("{}: {}", block.file_name(), block.content);
/// }
/// ```
pub fn extract_text_blocks<P: AsRef<Path>>(path: P) -> Result<Vec<TextBlock>> {
    let document = LopdfSource::new().load(path.as_ref())?;
    Ok(BlockExtractor::default().extract(&document))
}
