//! OCR batch runner: every image in a directory through the OCR service.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use super::client::{OcrClient, OcrEndpoint};
use super::preview::OcrPreview;
use crate::detect::is_image_path;
use crate::error::{Error, Result};

/// Suffix of the per-image JSON result file.
pub const OCR_RESULT_SUFFIX: &str = "_ocr_result.json";

/// Image files directly inside `dir` (not recursive), unique and sorted.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("image directory {} does not exist", dir.display()),
        )));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            images.push(path);
        }
    }
    images.sort();
    images.dedup();
    Ok(images)
}

/// `<stem>_ocr_result.json`
pub fn result_file_name(image: &Path) -> String {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", stem, OCR_RESULT_SUFFIX)
}

/// Write `value` as JSON indented by four spaces, keeping non-ASCII text as is.
pub fn write_json_pretty(value: &Value, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    let mut file = fs::File::create(path)?;
    file.write_all(&buf)?;
    Ok(())
}

/// Result of recognizing one image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageOcrResult {
    /// Where the raw response was written
    pub output: PathBuf,

    /// Preview of the recognized lines
    pub preview: OcrPreview,
}

/// Recognize `image` and save the raw response into `out_dir`.
pub fn process_image(
    client: &dyn OcrClient,
    image: &Path,
    out_dir: &Path,
    preview_lines: usize,
) -> Result<ImageOcrResult> {
    let bytes = fs::read(image)?;
    let response = client.recognize(OcrEndpoint::AccurateBasic, &bytes)?;

    let output = out_dir.join(result_file_name(image));
    write_json_pretty(&response, &output)?;
    log::info!("{}: OCR result saved to {}", image.display(), output.display());

    Ok(ImageOcrResult {
        output,
        preview: OcrPreview::from_response(&response, preview_lines),
    })
}

/// Progress notifications emitted by [`run_batch`].
#[derive(Debug)]
pub enum OcrEvent<'a> {
    /// An image is about to be sent (`index` is 1-based)
    Started {
        index: usize,
        total: usize,
        path: &'a Path,
    },

    /// An image is done
    Finished {
        index: usize,
        path: &'a Path,
        result: &'a Result<ImageOcrResult>,
    },
}

/// Totals of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OcrSummary {
    pub total: usize,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

impl OcrSummary {
    /// Images whose result was saved.
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    /// Images that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Recognize every image in `images`, saving results under `out_dir`.
///
/// Per-image failures are logged and collected; only failing to create
/// `out_dir` aborts the batch.
pub fn run_batch<F>(
    client: &dyn OcrClient,
    images: &[PathBuf],
    out_dir: &Path,
    preview_lines: usize,
    mut on_event: F,
) -> Result<OcrSummary>
where
    F: FnMut(OcrEvent<'_>),
{
    fs::create_dir_all(out_dir)?;

    let mut summary = OcrSummary {
        total: images.len(),
        ..OcrSummary::default()
    };

    for (i, path) in images.iter().enumerate() {
        let index = i + 1;
        on_event(OcrEvent::Started {
            index,
            total: images.len(),
            path,
        });

        let result = process_image(client, path, out_dir, preview_lines);
        match &result {
            Ok(done) => summary.outputs.push(done.output.clone()),
            Err(e) => {
                log::error!("{}: OCR failed: {}", path.display(), e);
                summary.failures.push((path.clone(), e.to_string()));
            }
        }

        on_event(OcrEvent::Finished {
            index,
            path,
            result: &result,
        });
    }

    Ok(summary)
}
