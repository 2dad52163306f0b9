//! Directory walker and output mirror.
//!
//! Every document under the input directory gets two output folders that
//! mirror its relative location:
//!
//! ```text
//! <output>/text_blocks/<relative-parent>/<stem>/block_NNN.txt
//! <output>/images/<relative-parent>/<stem>/image_NNN.png
//! ```
//!
//! Documents are processed one at a time in lexical path order. A failing
//! document is logged and recorded in the [`RunSummary`]; it never stops
//! the walk. When two documents map to the same folders (`report.pdf` and
//! `report.PDF`), the first in path order owns them and the rest fail.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::detect::{has_extension, read_pdf_header};
use crate::error::{Error, Result};
use crate::parser::{LopdfSource, TextSource};
use crate::raster::{extract_images, PageRenderer, PdfiumRenderer, RenderOptions};
use crate::segment::{write_blocks, BlockExtractor, BlockOptions};

/// Name of the text output root under the output directory.
pub const TEXT_BLOCKS_DIR: &str = "text_blocks";

/// Name of the image output root under the output directory.
pub const IMAGES_DIR: &str = "images";

/// Options for a directory run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Extension of the files to process, matched case-insensitively
    pub document_extension: String,

    /// Sentence grouping options
    pub blocks: BlockOptions,

    /// Page rendering options
    pub render: RenderOptions,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document extension (without the dot).
    pub fn with_document_extension(mut self, extension: impl Into<String>) -> Self {
        self.document_extension = extension.into();
        self
    }

    /// Set block options.
    pub fn with_block_options(mut self, blocks: BlockOptions) -> Self {
        self.blocks = blocks;
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            document_extension: "pdf".to_string(),
            blocks: BlockOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

/// The two output roots of a run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    text_root: PathBuf,
    image_root: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            text_root: output_dir.join(TEXT_BLOCKS_DIR),
            image_root: output_dir.join(IMAGES_DIR),
        }
    }

    /// Text folder for a document given its path relative to the input root.
    pub fn text_dir(&self, relative: &Path) -> PathBuf {
        mirror(&self.text_root, relative)
    }

    /// Image folder for a document given its path relative to the input root.
    pub fn image_dir(&self, relative: &Path) -> PathBuf {
        mirror(&self.image_root, relative)
    }

    fn create_roots(&self) -> io::Result<()> {
        fs::create_dir_all(&self.text_root)?;
        fs::create_dir_all(&self.image_root)
    }
}

/// `root/<relative parent>/<relative stem>`
fn mirror(root: &Path, relative: &Path) -> PathBuf {
    let mut dir = root.to_path_buf();
    if let Some(parent) = relative.parent() {
        dir.push(parent);
    }
    if let Some(stem) = relative.file_stem() {
        dir.push(stem);
    }
    dir
}

/// Counts for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Text block files written
    pub blocks: usize,

    /// Pages rendered, including blank ones
    pub pages_rendered: u32,

    /// Image files written
    pub images: usize,

    /// Rendering failure; text output is unaffected by it
    pub image_error: Option<String>,
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentOutcome {
    /// Text extraction succeeded (images may still have failed)
    Processed(DocumentReport),

    /// The input could not be read or is not a PDF
    Skipped { reason: String },

    /// Output folders or text extraction failed
    Failed {
        error: String,
        report: DocumentReport,
    },
}

/// A document path with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
}

impl DocumentResult {
    /// Counts for the document, if it got far enough to have any.
    pub fn report(&self) -> Option<&DocumentReport> {
        match &self.outcome {
            DocumentOutcome::Processed(report) => Some(report),
            DocumentOutcome::Failed { report, .. } => Some(report),
            DocumentOutcome::Skipped { .. } => None,
        }
    }
}

/// Aggregated result of a directory run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub documents: Vec<DocumentResult>,
}

impl RunSummary {
    /// Documents whose text was extracted.
    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Processed(_)))
    }

    /// Documents that could not be read.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped { .. }))
    }

    /// Documents that failed.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed { .. }))
    }

    /// Text block files written across the run.
    pub fn total_blocks(&self) -> usize {
        self.documents
            .iter()
            .filter_map(DocumentResult::report)
            .map(|r| r.blocks)
            .sum()
    }

    /// Image files written across the run.
    pub fn total_images(&self) -> usize {
        self.documents
            .iter()
            .filter_map(DocumentResult::report)
            .map(|r| r.images)
            .sum()
    }

    /// Documents with a rendering failure.
    pub fn image_failures(&self) -> usize {
        self.documents
            .iter()
            .filter_map(DocumentResult::report)
            .filter(|r| r.image_error.is_some())
            .count()
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.outcome)).count()
    }
}

/// Progress notifications emitted during a run.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Discovery finished
    Discovered { total: usize },

    /// A document is about to be processed (`index` is 1-based)
    Started { index: usize, path: &'a Path },

    /// A document is done
    Finished {
        index: usize,
        result: &'a DocumentResult,
    },
}

/// Walks a directory of PDFs and writes text blocks and page images.
pub struct Pipeline {
    source: Box<dyn TextSource>,
    renderer: Box<dyn PageRenderer>,
    blocks: BlockExtractor,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline with explicit backends.
    pub fn new(
        source: Box<dyn TextSource>,
        renderer: Box<dyn PageRenderer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            renderer,
            blocks: BlockExtractor::new(options.blocks.clone()),
            options,
        }
    }

    /// Create a pipeline using lopdf for text and Pdfium for rendering.
    pub fn with_default_backends(options: PipelineOptions) -> Self {
        Self::new(
            Box::new(LopdfSource::new()),
            Box::new(PdfiumRenderer::new()),
            options,
        )
    }

    /// Pipeline options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Find every document under `input_dir`, sorted by path.
    pub fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        if !input_dir.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input directory {} does not exist", input_dir.display()),
            )));
        }

        let mut found = Vec::new();
        collect_documents(input_dir, &self.options.document_extension, &mut found)?;
        found.sort();
        Ok(found)
    }

    /// Process every document under `input_dir` into `output_dir`.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<RunSummary> {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`Pipeline::run`], reporting progress through `on_event`.
    ///
    /// Only setup failures (missing input directory, output roots that
    /// cannot be created) are returned as errors.
    pub fn run_with_progress<F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        mut on_event: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(ProgressEvent<'_>),
    {
        let documents = self.discover(input_dir)?;
        let layout = OutputLayout::new(output_dir);
        layout.create_roots()?;

        log::info!(
            "found {} documents under {}",
            documents.len(),
            input_dir.display()
        );
        on_event(ProgressEvent::Discovered {
            total: documents.len(),
        });

        let mut results = Vec::with_capacity(documents.len());
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        for (i, path) in documents.into_iter().enumerate() {
            let index = i + 1;
            on_event(ProgressEvent::Started {
                index,
                path: &path,
            });

            let relative = path
                .strip_prefix(input_dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(path.file_name().unwrap_or_default()));
            let target = layout.text_dir(&relative);
            let outcome = match claimed.get(&target) {
                Some(owner) => {
                    let error = format!(
                        "output folder {} is already used by {}",
                        target.display(),
                        owner.display()
                    );
                    log::error!("{}: {}", path.display(), error);
                    DocumentOutcome::Failed {
                        error,
                        report: DocumentReport::default(),
                    }
                }
                None => {
                    let outcome = self.process_document(&path, &relative, &layout);
                    if !matches!(outcome, DocumentOutcome::Skipped { .. }) {
                        claimed.insert(target, path.clone());
                    }
                    outcome
                }
            };

            let result = DocumentResult { path, outcome };
            on_event(ProgressEvent::Finished {
                index,
                result: &result,
            });
            results.push(result);
        }

        Ok(RunSummary {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            documents: results,
        })
    }

    /// Extract text blocks, then images, for a single document.
    ///
    /// `relative` is the document's path relative to the input root and
    /// decides where output lands.
    pub fn process_document(
        &self,
        path: &Path,
        relative: &Path,
        layout: &OutputLayout,
    ) -> DocumentOutcome {
        if let Err(e) = read_pdf_header(path) {
            log::warn!("{}: skipped: {}", path.display(), e);
            return DocumentOutcome::Skipped {
                reason: e.to_string(),
            };
        }

        let text_dir = layout.text_dir(relative);
        let image_dir = layout.image_dir(relative);
        if let Err(e) = fs::create_dir_all(&text_dir).and_then(|_| fs::create_dir_all(&image_dir))
        {
            log::error!("{}: cannot create output folders: {}", path.display(), e);
            return DocumentOutcome::Failed {
                error: Error::from(e).to_string(),
                report: DocumentReport::default(),
            };
        }

        let mut report = DocumentReport::default();
        let text_error = match self.write_text_blocks(path, &text_dir) {
            Ok(count) => {
                report.blocks = count;
                None
            }
            Err(e) => {
                log::error!("{}: text extraction failed: {}", path.display(), e);
                Some(e.to_string())
            }
        };

        let images = extract_images(
            self.renderer.as_ref(),
            path,
            &image_dir,
            &self.options.render,
        );
        report.pages_rendered = images.pages_rendered;
        report.images = images.written();
        report.image_error = images.error;

        log::info!(
            "{}: {} blocks, {} of {} pages kept as images",
            path.display(),
            report.blocks,
            report.images,
            report.pages_rendered
        );

        match text_error {
            Some(error) => DocumentOutcome::Failed { error, report },
            None => DocumentOutcome::Processed(report),
        }
    }

    fn write_text_blocks(&self, path: &Path, text_dir: &Path) -> Result<usize> {
        let document = self.source.load(path)?;
        if document.has_no_text() {
            log::info!("{}: no extractable text", path.display());
        }
        let blocks = self.blocks.extract(&document);
        let written = write_blocks(&blocks, text_dir)?;
        Ok(written.len())
    }
}

/// Depth-first collection of matching files. Unreadable subdirectories are
/// logged and skipped; an unreadable root is an error.
fn collect_documents(dir: &Path, extension: &str, found: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if let Err(e) = collect_documents(&path, extension, found) {
                log::warn!("{}: cannot read directory: {}", path.display(), e);
            }
        } else if path.is_file() && has_extension(&path, extension) {
            found.push(path);
        }
    }
    Ok(())
}
