//! Page rasterization, blank-page filtering and PNG output.

mod blank;
mod images;
mod options;
mod pdfium;

pub use blank::{exceeds_threshold, is_meaningful, pixel_variance, BLANK_VARIANCE_THRESHOLD};
pub use images::{extract_images, save_png, ImageReport, PageRenderer, RenderedPage};
pub use options::RenderOptions;
pub use pdfium::PdfiumRenderer;
