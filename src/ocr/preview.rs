//! Human-readable summary of an OCR response.

use serde::Serialize;
use serde_json::Value;

/// One recognized line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewLine {
    /// Line number in the response (1-indexed)
    pub number: usize,

    /// Recognized text
    pub words: String,

    /// Average confidence, when the service returned one
    pub confidence: Option<f64>,
}

/// The first few recognized lines, or the keys of an unexpected payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OcrPreview {
    /// `words_result` was present
    Lines {
        total: usize,
        shown: Vec<PreviewLine>,
    },

    /// No usable `words_result`; lists the top-level keys instead
    Unrecognized { keys: Vec<String> },
}

impl OcrPreview {
    /// Build a preview showing at most `max_lines` lines.
    pub fn from_response(response: &Value, max_lines: usize) -> Self {
        let Some(lines) = response.get("words_result").and_then(Value::as_array) else {
            let keys = response
                .as_object()
                .map(|map| map.keys().cloned().collect())
                .unwrap_or_default();
            return OcrPreview::Unrecognized { keys };
        };

        let shown = lines
            .iter()
            .enumerate()
            .take(max_lines)
            .filter_map(|(i, item)| {
                let words = item.get("words")?.as_str()?;
                Some(PreviewLine {
                    number: i + 1,
                    words: words.to_string(),
                    confidence: item
                        .get("probability")
                        .and_then(|p| p.get("average"))
                        .and_then(Value::as_f64),
                })
            })
            .collect();

        OcrPreview::Lines {
            total: lines.len(),
            shown,
        }
    }

    /// Lines recognized but not shown.
    pub fn hidden(&self) -> usize {
        match self {
            OcrPreview::Lines { total, shown } => total.saturating_sub(shown.len()),
            OcrPreview::Unrecognized { .. } => 0,
        }
    }
}
