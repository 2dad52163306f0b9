//! Text backend abstraction layer.
//!
//! The block extractor only needs per-page plain text. [`TextSource`]
//! isolates the concrete PDF library (lopdf) behind that one operation so
//! the walker can be driven by other backends, including test doubles.

use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::read_pdf_header;
use crate::error::{Error, Result};
use crate::model::{Document, PageText};

/// Loads the per-page text of a document.
pub trait TextSource {
    /// Backend name used in log lines.
    fn name(&self) -> &str;

    /// Load every page's text, in page order.
    ///
    /// A document without pages is an error. A page whose text cannot be
    /// decoded is returned blank rather than failing the document.
    fn load(&self, path: &Path) -> Result<Document>;
}

/// [`TextSource`] backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfSource;

impl LopdfSource {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<LopdfDocument> {
        read_pdf_header(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(doc)
    }
}

impl TextSource for LopdfSource {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn load(&self, path: &Path) -> Result<Document> {
        let doc = Self::open(path)?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(Error::PdfParse("document has no pages".to_string()));
        }

        let mut document = Document::new(path);
        for &number in pages.keys() {
            let text = match page_text(&doc, number) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("{}: treating page as blank: {}", path.display(), e);
                    String::new()
                }
            };
            document.add_page(PageText::new(number, text));
        }

        log::debug!(
            "{}: loaded {} pages via {}",
            path.display(),
            document.page_count(),
            self.name()
        );
        Ok(document)
    }
}

/// Text of one page; lopdf failures become [`Error::TextExtract`].
fn page_text(doc: &LopdfDocument, number: u32) -> Result<String> {
    doc.extract_text(&[number])
        .map_err(|e| Error::TextExtract(format!("page {}: {}", number, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn save_pdf(doc: &mut LopdfDocument, dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        doc.save(&path).unwrap();
        path
    }

    fn single_page_pdf(text: &str) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_load_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut pdf = single_page_pdf("Hello World");
        let path = save_pdf(&mut pdf, dir.path(), "hello.pdf");

        let doc = LopdfSource::new().load(&path).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].number, 1);
        assert!(doc.pages[0].text.contains("Hello"));
    }

    #[test]
    fn test_zero_page_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let path = save_pdf(&mut doc, dir.path(), "empty.pdf");

        let err = LopdfSource::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }

    #[test]
    fn test_non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "just some notes, not a pdf").unwrap();

        let err = LopdfSource::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LopdfSource::new()
            .load(&dir.path().join("missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
