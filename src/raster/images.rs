//! Image extraction: render pages, drop blank ones, save the rest as PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::{FilterType as PngFilterType, PngEncoder};
use image::DynamicImage;
use serde::Serialize;

use super::blank::{exceeds_threshold, pixel_variance};
use super::options::RenderOptions;
use crate::error::Result;
use crate::model::{image_file_name, ExtractedImage};

/// One rasterized page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page ordinal in the full document (1-indexed)
    pub number: u32,

    /// Rendered pixels
    pub image: DynamicImage,
}

/// Rasterizes the pages of a document one at a time.
pub trait PageRenderer {
    /// Renderer name used in log lines.
    fn name(&self) -> &str;

    /// Render pages in page order, handing each to `on_page` before the
    /// next one is rendered.
    ///
    /// Stops at the first error, whether from rendering or from `on_page`.
    /// Pages already handed over stay handed over.
    fn render_pages(
        &self,
        path: &Path,
        options: &RenderOptions,
        on_page: &mut dyn FnMut(RenderedPage) -> Result<()>,
    ) -> Result<()>;
}

/// Outcome of extracting images from one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageReport {
    /// Pages rendered (attempted), whether or not they were kept
    pub pages_rendered: u32,

    /// Pages that passed the blank filter and were written
    pub images: Vec<ExtractedImage>,

    /// Rendering or write failure, already logged
    pub error: Option<String>,
}

impl ImageReport {
    /// Number of image files written.
    pub fn written(&self) -> usize {
        self.images.len()
    }
}

/// Render a document and save its non-blank pages into `dir`.
///
/// Files are named `image_NNN.png` after the page ordinal, so a skipped
/// blank page leaves a gap in the numbering. Each page is dropped once it
/// has been judged and saved. Failures are logged and reported in
/// [`ImageReport::error`]; they never propagate, and images written before
/// the failure are kept.
pub fn extract_images(
    renderer: &dyn PageRenderer,
    path: &Path,
    dir: &Path,
    options: &RenderOptions,
) -> ImageReport {
    let mut report = ImageReport::default();

    let outcome = renderer.render_pages(path, options, &mut |page| {
        report.pages_rendered += 1;

        let variance = pixel_variance(&page.image);
        if !exceeds_threshold(variance) {
            log::debug!(
                "{}: page {} looks blank (variance {:.1})",
                path.display(),
                page.number,
                variance
            );
            return Ok(());
        }

        let target = dir.join(image_file_name(page.number));
        save_png(&page.image, &target, options)?;
        report.images.push(ExtractedImage {
            page: page.number,
            variance,
            path: target,
        });
        Ok(())
    });

    if let Err(e) = outcome {
        log::error!(
            "{}: image extraction with {} stopped after {} pages: {}",
            path.display(),
            renderer.name(),
            report.pages_rendered,
            e
        );
        report.error = Some(e.to_string());
    }

    report
}

/// Encode `image` as PNG at `path`.
pub fn save_png(image: &DynamicImage, path: &Path, options: &RenderOptions) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder =
        PngEncoder::new_with_quality(&mut writer, options.compression(), PngFilterType::Adaptive);
    image.write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{GrayImage, Luma};

    struct FixedRenderer {
        pages: Vec<bool>,
        fail_at: Option<u32>,
    }

    impl PageRenderer for FixedRenderer {
        fn name(&self) -> &str {
            "fixed"
        }

        fn render_pages(
            &self,
            _path: &Path,
            _options: &RenderOptions,
            on_page: &mut dyn FnMut(RenderedPage) -> Result<()>,
        ) -> Result<()> {
            for (i, &content) in self.pages.iter().enumerate() {
                if i as u32 + 1 == self.fail_at.unwrap_or(0) {
                    return Err(Error::Render(format!("page {} is damaged", i + 1)));
                }
                let img = GrayImage::from_fn(40, 40, |x, y| {
                    if content && (x / 4 + y / 4) % 2 == 0 {
                        Luma([0])
                    } else {
                        Luma([255])
                    }
                });
                on_page(RenderedPage {
                    number: i as u32 + 1,
                    image: DynamicImage::ImageLuma8(img),
                })?;
            }
            Ok(())
        }
    }

    fn fixed(pages: Vec<bool>) -> FixedRenderer {
        FixedRenderer {
            pages,
            fail_at: None,
        }
    }

    struct BrokenRenderer;

    impl PageRenderer for BrokenRenderer {
        fn name(&self) -> &str {
            "broken"
        }

        fn render_pages(
            &self,
            _path: &Path,
            _options: &RenderOptions,
            _on_page: &mut dyn FnMut(RenderedPage) -> Result<()>,
        ) -> Result<()> {
            Err(Error::Render("corrupt xref".to_string()))
        }
    }

    #[test]
    fn test_blank_pages_leave_numbering_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = fixed(vec![true, false, true]);

        let report = extract_images(
            &renderer,
            Path::new("doc.pdf"),
            dir.path(),
            &RenderOptions::default(),
        );

        assert_eq!(report.pages_rendered, 3);
        assert_eq!(report.written(), 2);
        assert!(report.error.is_none());
        let pages: Vec<u32> = report.images.iter().map(|i| i.page).collect();
        assert_eq!(pages, vec![1, 3]);
        assert!(dir.path().join("image_001.png").exists());
        assert!(!dir.path().join("image_002.png").exists());
        assert!(dir.path().join("image_003.png").exists());
    }

    #[test]
    fn test_saved_png_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = fixed(vec![true]);
        extract_images(
            &renderer,
            Path::new("doc.pdf"),
            dir.path(),
            &RenderOptions::default(),
        );

        let saved = image::open(dir.path().join("image_001.png")).unwrap();
        assert_eq!((saved.width(), saved.height()), (40, 40));
    }

    #[test]
    fn test_render_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let report = extract_images(
            &BrokenRenderer,
            Path::new("bad.pdf"),
            dir.path(),
            &RenderOptions::default(),
        );

        assert_eq!(report.pages_rendered, 0);
        assert_eq!(report.written(), 0);
        assert!(report.error.unwrap().contains("corrupt xref"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does/not/exist");
        let renderer = fixed(vec![true, true]);

        let report = extract_images(
            &renderer,
            Path::new("doc.pdf"),
            &missing,
            &RenderOptions::default(),
        );

        // The first save fails and rendering stops there.
        assert_eq!(report.pages_rendered, 1);
        assert_eq!(report.written(), 0);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_failure_mid_document_keeps_earlier_pages() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FixedRenderer {
            pages: vec![true, false, true, true],
            fail_at: Some(4),
        };

        let report = extract_images(
            &renderer,
            Path::new("doc.pdf"),
            dir.path(),
            &RenderOptions::default(),
        );

        assert_eq!(report.pages_rendered, 3);
        let pages: Vec<u32> = report.images.iter().map(|i| i.page).collect();
        assert_eq!(pages, vec![1, 3]);
        assert!(report.error.unwrap().contains("page 4 is damaged"));
        assert!(dir.path().join("image_003.png").exists());
        assert!(!dir.path().join("image_004.png").exists());
    }

    #[test]
    fn test_pages_are_saved_as_they_are_rendered() {
        struct Watching<'a> {
            dir: &'a Path,
        }

        impl PageRenderer for Watching<'_> {
            fn name(&self) -> &str {
                "watching"
            }

            fn render_pages(
                &self,
                _path: &Path,
                _options: &RenderOptions,
                on_page: &mut dyn FnMut(RenderedPage) -> Result<()>,
            ) -> Result<()> {
                for number in 1..=3u32 {
                    let img = GrayImage::from_fn(20, 20, |x, _| Luma([(x * 12) as u8]));
                    on_page(RenderedPage {
                        number,
                        image: DynamicImage::ImageLuma8(img),
                    })?;
                    assert!(self.dir.join(image_file_name(number)).exists());
                }
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let report = extract_images(
            &Watching { dir: dir.path() },
            Path::new("doc.pdf"),
            dir.path(),
            &RenderOptions::default(),
        );
        assert_eq!(report.written(), 3);
    }
}
