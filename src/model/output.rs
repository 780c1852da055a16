//! Assembled document output.

use crate::error::Result;
use crate::model::PageResult;
use serde::{Deserialize, Serialize};

/// Separator between pages in paged output.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Separator between chunks in chunked output.
pub const CHUNK_SEPARATOR: &str = "\n\n\n\n\n";

/// Header line for a page in paged output.
pub fn page_header(number: u32) -> String {
    format!("=== Page {} ===", number)
}

/// A run of whole sentences, sized for downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the document (0-indexed)
    pub index: usize,

    /// Sentences joined by single spaces
    pub text: String,

    /// Whitespace-separated words in `text`
    pub word_count: usize,

    /// Sentences in `text`
    pub sentence_count: usize,
}

/// Final text of a document, in one of the two assembly modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "items", rename_all = "snake_case")]
pub enum DocumentOutput {
    /// One entry per page, in page order
    Paged(Vec<PageResult>),
    /// Sentence-preserving chunks, in document order
    Chunked(Vec<Chunk>),
}

impl DocumentOutput {
    /// Render as plain text.
    ///
    /// Paged output writes a `=== Page N ===` header before every page,
    /// including empty ones. Chunked output separates chunks with blank lines.
    pub fn render(&self) -> String {
        match self {
            DocumentOutput::Paged(pages) => pages
                .iter()
                .map(|page| format!("{}\n{}", page_header(page.number), page.text))
                .collect::<Vec<_>>()
                .join(PAGE_SEPARATOR),
            DocumentOutput::Chunked(chunks) => chunks
                .iter()
                .map(|chunk| chunk.text.as_str())
                .collect::<Vec<_>>()
                .join(CHUNK_SEPARATOR),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)?,
            JsonFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }

    /// Number of pages or chunks.
    pub fn len(&self) -> usize {
        match self {
            DocumentOutput::Paged(pages) => pages.len(),
            DocumentOutput::Chunked(chunks) => chunks.len(),
        }
    }

    /// Whether the output carries no text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentOutput::Paged(pages) => pages.iter().all(PageResult::is_empty),
            DocumentOutput::Chunked(chunks) => chunks.is_empty(),
        }
    }

    /// Total word count.
    pub fn word_count(&self) -> usize {
        match self {
            DocumentOutput::Paged(pages) => pages.iter().map(PageResult::word_count).sum(),
            DocumentOutput::Chunked(chunks) => chunks.iter().map(|c| c.word_count).sum(),
        }
    }
}

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk {
            index,
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
            sentence_count: 1,
        }
    }

    #[test]
    fn test_render_paged() {
        let output = DocumentOutput::Paged(vec![
            PageResult::new(1, "First page."),
            PageResult::new(2, ""),
            PageResult::new(3, "Third page."),
        ]);
        assert_eq!(
            output.render(),
            "=== Page 1 ===\nFirst page.\n\n=== Page 2 ===\n\n\n=== Page 3 ===\nThird page."
        );
        assert_eq!(output.word_count(), 4);
        assert!(!output.is_empty());
    }

    #[test]
    fn test_render_chunked() {
        let output = DocumentOutput::Chunked(vec![chunk(0, "One two."), chunk(1, "Three.")]);
        assert_eq!(output.render(), "One two.\n\n\n\n\nThree.");
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_empty_outputs() {
        assert!(DocumentOutput::Chunked(Vec::new()).is_empty());
        assert_eq!(DocumentOutput::Chunked(Vec::new()).render(), "");
        assert!(DocumentOutput::Paged(vec![PageResult::new(1, "")]).is_empty());
    }

    #[test]
    fn test_to_json_pretty() {
        let output = DocumentOutput::Chunked(vec![chunk(0, "Hello world.")]);
        let json = output.to_json(JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"mode\": \"chunked\""));
        assert!(json.contains("Hello world."));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let output = DocumentOutput::Paged(vec![PageResult::new(1, "Hello.")]);
        let json = output.to_json(JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        let back: DocumentOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }
}
