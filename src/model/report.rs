//! Processing reports for pages, documents and batches.

use crate::error::Result;
use crate::model::{DocumentOutput, JsonFormat, PageStatus};
use crate::reconcile::Decision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How one page was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub number: u32,

    /// Which acquisitions succeeded
    pub status: PageStatus,

    /// Which reconciliation branch was taken
    pub decision: Decision,
}

/// Outcome of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Every page had both sources
    Succeeded,
    /// Output written, but at least one page was missing a source
    Degraded,
    /// No output produced
    Failed,
}

/// Statistics collected while reconciling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Pages with no text after reconciliation
    pub empty_pages: u32,

    /// Pages with at least one source missing
    pub degraded_pages: u32,

    /// Pages where native and OCR text agreed
    pub agreed_pages: u32,

    /// Pages where OCR sentences were considered for merging
    pub merged_pages: u32,

    /// OCR sentences appended across all pages
    pub appended_sentences: u32,

    /// Approximate word count of the output
    pub word_count: u32,

    /// Number of chunks (0 in paged mode)
    pub chunk_count: u32,
}

impl ReconcileStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one page.
    pub fn record_page(&mut self, report: &PageReport, text: &str) {
        self.page_count += 1;
        if text.is_empty() {
            self.empty_pages += 1;
        }
        if report.status.is_degraded() {
            self.degraded_pages += 1;
        }
        match report.decision {
            Decision::Agreed { .. } => self.agreed_pages += 1,
            Decision::Merged { appended, .. } => {
                self.merged_pages += 1;
                self.appended_sentences += appended as u32;
            }
            _ => {}
        }
    }

    /// Count the assembled output.
    pub fn record_output(&mut self, output: &DocumentOutput) {
        self.word_count = output.word_count() as u32;
        self.chunk_count = match output {
            DocumentOutput::Chunked(chunks) => chunks.len() as u32,
            DocumentOutput::Paged(_) => 0,
        };
    }

    /// Merge statistics from another document.
    pub fn merge(&mut self, other: &ReconcileStats) {
        self.page_count += other.page_count;
        self.empty_pages += other.empty_pages;
        self.degraded_pages += other.degraded_pages;
        self.agreed_pages += other.agreed_pages;
        self.merged_pages += other.merged_pages;
        self.appended_sentences += other.appended_sentences;
        self.word_count += other.word_count;
        self.chunk_count += other.chunk_count;
    }
}

/// Report for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document identifier
    pub id: String,

    /// Outcome
    pub status: DocumentStatus,

    /// Per-page reports, in page order
    pub pages: Vec<PageReport>,

    /// Aggregate statistics
    pub stats: ReconcileStats,

    /// Failure reason, for failed documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReport {
    /// Build a report from page reports; status follows from page statuses.
    pub fn new(id: impl Into<String>, pages: Vec<PageReport>, stats: ReconcileStats) -> Self {
        let status = if pages.iter().any(|p| p.status.is_degraded()) {
            DocumentStatus::Degraded
        } else {
            DocumentStatus::Succeeded
        };
        Self {
            id: id.into(),
            status,
            pages,
            stats,
            error: None,
        }
    }

    /// Report for a document that produced no output.
    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: DocumentStatus::Failed,
            pages: Vec::new(),
            stats: ReconcileStats::default(),
            error: Some(error.into()),
        }
    }

    /// Mark the document as failed after processing (e.g. the write failed).
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = DocumentStatus::Failed;
        self.error = Some(error.into());
    }

    /// Pages produced with at least one source missing.
    pub fn degraded_pages(&self) -> impl Iterator<Item = &PageReport> {
        self.pages.iter().filter(|p| p.status.is_degraded())
    }
}

/// Report for a batch of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// When the batch finished
    pub finished_at: DateTime<Utc>,

    /// Per-document reports, in input order
    pub documents: Vec<DocumentReport>,

    /// Documents with every page complete
    pub succeeded: usize,

    /// Documents written with missing sources on some pages
    pub degraded: usize,

    /// Documents with no output
    pub failed: usize,

    /// Statistics over all documents
    pub totals: ReconcileStats,
}

impl BatchReport {
    /// Build a batch report from per-document reports.
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        documents: Vec<DocumentReport>,
    ) -> Self {
        let count = |status: DocumentStatus| documents.iter().filter(|d| d.status == status).count();
        let succeeded = count(DocumentStatus::Succeeded);
        let degraded = count(DocumentStatus::Degraded);
        let failed = count(DocumentStatus::Failed);

        let mut totals = ReconcileStats::default();
        for doc in &documents {
            totals.merge(&doc.stats);
        }

        Self {
            started_at,
            finished_at,
            documents,
            succeeded,
            degraded,
            failed,
            totals,
        }
    }

    /// Wall-clock duration of the batch.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Whether every document produced output.
    pub fn all_written(&self) -> bool {
        self.failed == 0
    }

    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)?,
            JsonFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }
}
