//! [`PageRenderer`] backed by Pdfium.
//!
//! The Pdfium shared library is bound lazily on the first render, so a
//! missing library only costs the images: text extraction keeps working and
//! each document reports a rendering error.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use once_cell::unsync::OnceCell;
use pdfium_render::prelude::*;

use super::images::{PageRenderer, RenderedPage};
use super::options::RenderOptions;
use crate::error::{Error, Result};

/// Directories searched for the Pdfium library before the system paths.
const DEFAULT_LIBRARY_DIRS: &[&str] = &["./", "./lib/"];

/// Renders pages through the Pdfium C library.
pub struct PdfiumRenderer {
    library_dirs: Vec<String>,
    pdfium: OnceCell<Pdfium>,
}

impl PdfiumRenderer {
    /// Search `./`, `./lib/`, then the system library paths.
    pub fn new() -> Self {
        Self::with_library_dirs(DEFAULT_LIBRARY_DIRS.iter().map(|d| d.to_string()))
    }

    /// Search the given directories, then the system library paths.
    pub fn with_library_dirs<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            library_dirs: dirs.into_iter().map(Into::into).collect(),
            pdfium: OnceCell::new(),
        }
    }

    fn pdfium(&self) -> Result<&Pdfium> {
        self.pdfium.get_or_try_init(|| {
            for dir in &self.library_dirs {
                let candidate = Pdfium::pdfium_platform_library_name_at_path(dir.as_str());
                match Pdfium::bind_to_library(candidate) {
                    Ok(bindings) => {
                        log::info!("Pdfium bound from {}", dir);
                        return Ok(Pdfium::new(bindings));
                    }
                    Err(e) => log::debug!("Pdfium not found in {}: {:?}", dir, e),
                }
            }

            let bindings = Pdfium::bind_to_system_library().map_err(|e| {
                Error::Render(format!(
                    "failed to load the Pdfium library (searched {:?} and system paths): {:?}",
                    self.library_dirs, e
                ))
            })?;
            log::info!("Pdfium bound from system library paths");
            Ok(Pdfium::new(bindings))
        })
    }
}

impl Default for PdfiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer for PdfiumRenderer {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn render_pages(
        &self,
        path: &Path,
        options: &RenderOptions,
        on_page: &mut dyn FnMut(RenderedPage) -> Result<()>,
    ) -> Result<()> {
        let pdfium = self.pdfium()?;
        let document = pdfium.load_pdf_from_file(path, None)?;
        let config = PdfRenderConfig::new().scale_page_by_factor(options.scale());

        let mut count = 0;
        for (index, page) in document.pages().iter().enumerate() {
            let number = index as u32 + 1;
            let bitmap = page.render_with_config(&config)?;
            let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
            let pixels = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
                .ok_or_else(|| {
                    Error::Render(format!(
                        "page {}: bitmap does not match {}x{}",
                        number, width, height
                    ))
                })?;
            drop(bitmap);

            on_page(RenderedPage {
                number,
                image: DynamicImage::ImageRgba8(pixels),
            })?;
            count += 1;
        }

        log::debug!(
            "{}: rendered {} pages at {} dpi",
            path.display(),
            count,
            options.dpi
        );
        Ok(())
    }
}
