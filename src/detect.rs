//! Input detection: PDF header sniffing and file-extension matching.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Image extensions picked up by the OCR batch runner (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

/// Read the PDF header of a file on disk.
///
/// Fails with [`Error::Io`] when the file cannot be opened or is shorter
/// than a header, and with [`Error::UnknownFormat`] when the magic bytes
/// are missing.
pub fn read_pdf_header<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; PDF_MAGIC_LEN + VERSION_LEN];
    reader.read_exact(&mut header)?;
    parse_pdf_header(&header)
}

/// Parse a PDF header from the leading bytes of a file.
pub fn parse_pdf_header(data: &[u8]) -> Result<PdfHeader> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check whether `path` has the given extension, ignoring ASCII case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Check whether `path` names one of the supported OCR image formats.
pub fn is_image_path(path: &Path) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_valid_header() {
        let header = parse_pdf_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!(matches!(
            parse_pdf_header(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(parse_pdf_header(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(
            parse_pdf_header(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_read_header_from_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.pdf");
        std::fs::write(&path, b"%PD").unwrap();
        assert!(matches!(read_pdf_header(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_extension(&PathBuf::from("a/b/report.PDF"), "pdf"));
        assert!(!has_extension(&PathBuf::from("a/b/report.pdf.bak"), "pdf"));
        assert!(!has_extension(&PathBuf::from("README"), "pdf"));

        assert!(is_image_path(&PathBuf::from("scan.JPEG")));
        assert!(is_image_path(&PathBuf::from("scan.tiff")));
        assert!(!is_image_path(&PathBuf::from("scan.webp")));
    }
}
