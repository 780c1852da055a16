//! In-memory source.

use super::{SourceKind, TextSource};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Source backed by page strings held in memory.
///
/// A page stored as `None` fails on read, which is how tests and callers
/// simulate a collaborator that cannot deliver one page.
#[derive(Debug, Clone)]
pub struct MemorySource {
    kind: SourceKind,
    documents: HashMap<String, Vec<Option<String>>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            documents: HashMap::new(),
        }
    }

    /// Add a document whose pages all succeed.
    pub fn with_document<I, S>(mut self, doc: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = pages.into_iter().map(|p| Some(p.into())).collect();
        self.documents.insert(doc.into(), pages);
        self
    }

    /// Add a document where `None` pages fail.
    pub fn with_pages(mut self, doc: impl Into<String>, pages: Vec<Option<String>>) -> Self {
        self.documents.insert(doc.into(), pages);
        self
    }
}

impl TextSource for MemorySource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn page_count(&self, doc: &str) -> Result<u32> {
        self.documents
            .get(doc)
            .map(|pages| pages.len() as u32)
            .ok_or_else(|| Error::source_unavailable(self.kind, 0, format!("unknown document {}", doc)))
    }

    fn page_text(&self, doc: &str, page: u32) -> Result<String> {
        let pages = self
            .documents
            .get(doc)
            .ok_or_else(|| Error::source_unavailable(self.kind, page, format!("unknown document {}", doc)))?;
        page.checked_sub(1)
            .and_then(|i| pages.get(i as usize))
            .cloned()
            .flatten()
            .ok_or_else(|| Error::source_unavailable(self.kind, page, "page not available"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new(SourceKind::Native)
            .with_document("a", ["One.", "Two."])
            .with_pages("b", vec![Some("x".into()), None]);

        assert_eq!(source.page_count("a").unwrap(), 2);
        assert_eq!(source.page_text("a", 2).unwrap(), "Two.");
        assert!(source.page_text("a", 0).is_err());
        assert!(source.page_text("a", 3).is_err());
        assert!(source.page_text("b", 2).is_err());
        assert!(source.page_count("missing").is_err());
    }
}
