//! OCR batch tooling for images produced by (or alongside) the PDF pipeline.
//!
//! - [`client`]: the [`OcrClient`] seam and the Baidu REST implementation
//! - [`batch`]: scan a directory, save raw JSON results, preview lines
//! - [`check`]: verify credentials against a blank probe image

pub mod batch;
pub mod check;
pub mod client;
mod credentials;
mod preview;

pub use batch::{find_images, process_image, run_batch, ImageOcrResult, OcrEvent, OcrSummary};
pub use check::{check_credentials, explain_error_code, CredentialReport};
pub use client::{BaiduOcrClient, OcrClient, OcrEndpoint, OcrOptions};
pub use credentials::{mask, OcrCredentials, API_KEY_VAR, APP_ID_VAR, SECRET_KEY_VAR};
pub use preview::{OcrPreview, PreviewLine};
