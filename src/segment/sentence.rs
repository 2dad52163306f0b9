//! Sentence segmentation.
//!
//! [`PunctuationSplitter`] is a rule-based stand-in for a language model
//! segmenter, tuned for mixed Chinese/English PDF text. Line breaks are
//! boundaries too, so a heading on its own line is always its own sentence.

/// Splits page text into sentences.
pub trait SentenceSplitter {
    /// Split `text` into trimmed, non-empty sentences in reading order.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Characters that always end a sentence.
const TERMINATORS: &[char] = &['。', '！', '？', '；', '!', '?', ';'];

/// Closing quotes and brackets that stay attached to the sentence they close.
const CLOSERS: &[char] = &[
    '"', '\'', '”', '’', '」', '』', '）', ')', '】', ']', '》',
];

/// Punctuation-driven sentence splitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSplitter;

impl PunctuationSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSplitter for PunctuationSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if c == '\n' || c == '\r' {
                push_trimmed(&mut sentences, &text[start..i]);
                start = i + c.len_utf8();
                continue;
            }

            let next = chars.peek().map(|&(_, n)| n);
            let ends = TERMINATORS.contains(&c) || (c == '.' && is_full_stop(&text[start..i], next));
            if !ends {
                continue;
            }

            let mut end = i + c.len_utf8();
            while let Some(&(j, n)) = chars.peek() {
                if !(CLOSERS.contains(&n) || TERMINATORS.contains(&n)) {
                    break;
                }
                end = j + n.len_utf8();
                chars.next();
            }
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }

        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }
}

/// An ASCII `.` ends a sentence when followed by whitespace or end of text,
/// unless it only closes a section number such as `1.` or `2.3.`.
fn is_full_stop(before: &str, next: Option<char>) -> bool {
    if !next.map_or(true, char::is_whitespace) {
        return false;
    }
    let word = before.rsplit(char::is_whitespace).next().unwrap_or("");
    word.is_empty() || !word.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, span: &'a str) {
    let span = span.trim();
    if !span.is_empty() {
        sentences.push(span);
    }
}
