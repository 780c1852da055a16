//! Page-level types.

use serde::{Deserialize, Serialize};

/// Raw text of one page from both sources, before normalization.
///
/// `None` means the source failed for this page; `Some("")` means it
/// succeeded and returned nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Text from the document's embedded text layer
    pub native: Option<String>,

    /// Text from OCR of the rendered page
    pub ocr: Option<String>,
}

impl RawPage {
    /// Create a raw page.
    pub fn new(number: u32, native: Option<String>, ocr: Option<String>) -> Self {
        Self {
            number,
            native,
            ocr,
        }
    }

    /// Which sources delivered text for this page.
    pub fn status(&self) -> PageStatus {
        match (self.native.is_some(), self.ocr.is_some()) {
            (true, true) => PageStatus::Complete,
            (true, false) => PageStatus::OcrMissing,
            (false, true) => PageStatus::NativeMissing,
            (false, false) => PageStatus::BothMissing,
        }
    }
}

/// Reconciled text of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub number: u32,

    /// Cleaned, reconciled text (may be empty)
    pub text: String,
}

impl PageResult {
    /// Create a page result.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Whether the page has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Which acquisitions succeeded for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Both native and OCR text were acquired
    Complete,
    /// Native text failed, OCR only
    NativeMissing,
    /// OCR failed, native only
    OcrMissing,
    /// Both sources failed; the page result is empty
    BothMissing,
}

impl PageStatus {
    /// Whether the page was produced with at least one source missing.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, PageStatus::Complete)
    }
}
