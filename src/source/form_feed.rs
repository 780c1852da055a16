//! Directory source reading pre-extracted text files.
//!
//! Each document is a file `<dir>/<doc>.<suffix>.txt` holding the text of all
//! its pages separated by form feeds (`\x0c`), the page separator written by
//! common text extractors and OCR engines.

use super::{SourceKind, TextSource};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

const PAGE_BREAK: char = '\x0c';

/// Source reading form-feed separated page text from a directory.
#[derive(Debug)]
pub struct FormFeedSource {
    dir: PathBuf,
    suffix: String,
    kind: SourceKind,
    cache: Mutex<HashMap<String, Arc<Vec<String>>>>,
}

impl FormFeedSource {
    /// Create a source for files named `<doc>.<suffix>.txt` in `dir`.
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
            kind,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the file holding a document's pages.
    pub fn path_for(&self, doc: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.txt", doc, self.suffix))
    }

    fn pages(&self, doc: &str, page: u32) -> Result<Arc<Vec<String>>> {
        if let Some(pages) = self.lock_cache().get(doc) {
            return Ok(Arc::clone(pages));
        }

        let path = self.path_for(doc);
        let bytes = fs::read(&path).map_err(|e| {
            Error::source_unavailable(self.kind, page, format!("{}: {}", path.display(), e))
        })?;
        let pages = Arc::new(split_pages(&String::from_utf8_lossy(&bytes)));
        log::debug!(
            "Loaded {} {} pages from {}",
            pages.len(),
            self.kind,
            path.display()
        );

        // Another worker may have loaded the same document meanwhile.
        let mut cache = self.lock_cache();
        let pages = cache.entry(doc.to_string()).or_insert(pages);
        Ok(Arc::clone(pages))
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, Arc<Vec<String>>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TextSource for FormFeedSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn page_count(&self, doc: &str) -> Result<u32> {
        Ok(self.pages(doc, 0)?.len() as u32)
    }

    fn page_text(&self, doc: &str, page: u32) -> Result<String> {
        let pages = self.pages(doc, page)?;
        page.checked_sub(1)
            .and_then(|i| pages.get(i as usize))
            .cloned()
            .ok_or_else(|| {
                Error::source_unavailable(
                    self.kind,
                    page,
                    format!("document has {} pages", pages.len()),
                )
            })
    }

    fn release(&self, doc: &str) {
        self.lock_cache().remove(doc);
    }
}

/// Split on form feeds. A trailing empty segment (a final form feed) is not a page.
fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Document identifiers found in `dir`, in natural order (`doc2` before `doc10`).
///
/// A document is any stem with a `<stem>.<suffix>.txt` file for one of the
/// given suffixes.
pub fn discover_documents(dir: &Path, suffixes: &[&str]) -> Result<Vec<String>> {
    let mut docs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        for suffix in suffixes {
            let ending = format!(".{}.txt", suffix);
            if let Some(stem) = name.strip_suffix(&ending) {
                if !stem.is_empty() && !docs.iter().any(|d: &String| d == stem) {
                    docs.push(stem.to_string());
                }
            }
        }
    }
    docs.sort_by_cached_key(|d| natural_key(d));
    Ok(docs)
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Text(String),
    Number(u64),
}

/// Alternating text and number runs, always starting with a (possibly empty) text run.
fn natural_key(name: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in name.to_lowercase().chars() {
        if c.is_ascii_digit() {
            if digits.is_empty() {
                parts.push(KeyPart::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                parts.push(KeyPart::Number(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        parts.push(KeyPart::Number(digits.parse().unwrap_or(u64::MAX)));
    } else {
        parts.push(KeyPart::Text(text));
    }
    parts
}
