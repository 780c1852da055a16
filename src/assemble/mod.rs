//! Document assembly: fold reconciled pages into the final output.
//!
//! Assembly runs once every page of a document has a result. Pages are
//! always consumed in ascending page order.

mod chunked;
mod paged;

pub use chunked::{chunk_text, DEFAULT_CHUNK_TARGET_WORDS};
pub use paged::paged;

use crate::model::{DocumentOutput, PageResult};
use serde::{Deserialize, Serialize};

/// Output layout, chosen per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyMode {
    /// One section per page with a `=== Page N ===` header
    Paged,
    /// Pages flattened into one sentence stream and regrouped by word count
    #[default]
    Chunked,
}

impl std::fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyMode::Paged => write!(f, "paged"),
            AssemblyMode::Chunked => write!(f, "chunked"),
        }
    }
}

/// Assemble page results into a document output.
///
/// `target_words` is only used in chunked mode.
pub fn assemble(
    mut pages: Vec<PageResult>,
    mode: AssemblyMode,
    target_words: usize,
) -> DocumentOutput {
    pages.sort_by_key(|p| p.number);
    match mode {
        AssemblyMode::Paged => paged(pages),
        AssemblyMode::Chunked => {
            let stream = pages
                .iter()
                .map(|p| p.text.as_str())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            DocumentOutput::Chunked(chunk_text(&stream, target_words))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_reordered() {
        let pages = vec![
            PageResult::new(2, "Second."),
            PageResult::new(1, "First."),
        ];
        let output = assemble(pages, AssemblyMode::Paged, 100);
        assert_eq!(
            output.render(),
            "=== Page 1 ===\nFirst.\n\n=== Page 2 ===\nSecond."
        );
    }

    #[test]
    fn test_sentence_rejoined_across_pages() {
        let pages = vec![
            PageResult::new(1, "The limit exists and"),
            PageResult::new(2, "is unique. Next sentence."),
            PageResult::new(3, ""),
        ];
        let DocumentOutput::Chunked(chunks) = assemble(pages, AssemblyMode::Chunked, 3) else {
            panic!("expected chunked output");
        };
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "The limit exists and is unique.");
        assert_eq!(chunks[1].text, "Next sentence.");
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(AssemblyMode::Paged.to_string(), "paged");
        assert_eq!(AssemblyMode::default(), AssemblyMode::Chunked);
    }
}
