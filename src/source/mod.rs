//! Text sources: the collaborators that deliver raw page text.
//!
//! A source is a black box returning one raw string per page. The native
//! source reads a document's embedded text layer; the OCR source recognizes a
//! rendered image of the page. Neither engine is part of this crate; the
//! pipeline only needs the [`TextSource`] contract.
//!
//! # Example
//!
//! ```no_run
//! use pagemerge::source::{FormFeedSource, SourceKind, TextSource};
//!
//! fn main() -> pagemerge::Result<()> {
//!     let native = FormFeedSource::new("input", "native", SourceKind::Native);
//!     let pages = native.page_count("lecture01")?;
//!     println!("{} pages: {}", pages, native.page_text("lecture01", 1)?);
//!     Ok(())
//! }
//! ```

mod form_feed;
mod memory;

pub use form_feed::{discover_documents, FormFeedSource};
pub use memory::MemorySource;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which extraction produced a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Embedded text layer
    Native,
    /// Optical character recognition
    Ocr,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Native => write!(f, "native"),
            SourceKind::Ocr => write!(f, "ocr"),
        }
    }
}

/// Trait for page text sources.
///
/// Implementations must be callable from several worker threads at once.
/// Failures are reported as [`crate::Error::SourceUnavailable`] and are
/// recovered by the pipeline, never fatal.
pub trait TextSource: Send + Sync {
    /// Which extraction this source performs.
    fn kind(&self) -> SourceKind;

    /// Number of pages this source can deliver for a document.
    fn page_count(&self, doc: &str) -> Result<u32>;

    /// Raw text of one page (1-indexed). May be empty.
    fn page_text(&self, doc: &str, page: u32) -> Result<String>;

    /// Drop any state held for a document once the pipeline is done with it.
    fn release(&self, _doc: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(SourceKind::Native.to_string(), "native");
        assert_eq!(SourceKind::Ocr.to_string(), "ocr");
    }

    #[test]
    fn test_kind_serde() {
        assert_eq!(serde_json::to_string(&SourceKind::Ocr).unwrap(), "\"ocr\"");
    }
}
