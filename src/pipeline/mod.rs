//! Pipeline driver: acquire, normalize, reconcile and assemble documents.
//!
//! Per document:
//!
//! 1. Page counts are read from both sources; the larger count wins.
//! 2. Every page is acquired from both sources, native and OCR concurrently.
//! 3. One [`LineFrequencyTable`] is built per source (pass one).
//! 4. Each page is normalized against its table and reconciled (pass two).
//! 5. The ordered page results are assembled.
//!
//! A source failing for a page degrades that page to the other source. A
//! document that cannot be processed at all fails alone; its siblings in a
//! batch carry on.

mod options;

pub use options::PipelineOptions;

use crate::assemble::assemble;
use crate::error::{Error, Result};
use crate::model::{
    BatchReport, DocumentOutput, DocumentReport, PageReport, PageResult, PageStatus, RawPage,
    ReconcileStats,
};
use crate::output::OutputWriter;
use crate::reconcile::Reconciler;
use crate::source::TextSource;
use crate::text::{LineFrequencyTable, Normalizer};
use chrono::Utc;
use rayon::prelude::*;
use std::sync::Arc;

/// Output and report of one document.
#[derive(Debug, Clone)]
pub struct DocumentResult {
    /// Assembled text
    pub output: DocumentOutput,

    /// How it was produced
    pub report: DocumentReport,
}

/// Reconciliation pipeline over a native and an OCR source.
pub struct Pipeline {
    options: PipelineOptions,
    normalizer: Normalizer,
    reconciler: Reconciler,
    native: Arc<dyn TextSource>,
    ocr: Arc<dyn TextSource>,
}

impl Pipeline {
    /// Create a pipeline. Fails with [`Error::InvalidConfig`] on bad options.
    pub fn new(
        options: PipelineOptions,
        native: Arc<dyn TextSource>,
        ocr: Arc<dyn TextSource>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(options.normalize_options()),
            reconciler: Reconciler::new(options.similarity_threshold),
            options,
            native,
            ocr,
        })
    }

    /// The options this pipeline was built with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Process one document.
    pub fn process_document(&self, doc: &str) -> Result<DocumentResult> {
        let raw = self.acquire(doc);
        self.native.release(doc);
        self.ocr.release(doc);
        let raw = raw?;
        let (pages, reports) = self.reconcile_pages(&raw);

        let mut stats = ReconcileStats::new();
        for (page, report) in pages.iter().zip(&reports) {
            stats.record_page(report, &page.text);
        }

        let output = assemble(pages, self.options.mode, self.options.chunk_target_words);
        stats.record_output(&output);

        let report = DocumentReport::new(doc, reports, stats);
        let degraded = report.degraded_pages().count();
        if degraded > 0 {
            log::warn!(
                "Document {} degraded: {} of {} pages missing a source",
                doc,
                degraded,
                report.pages.len()
            );
        }
        log::info!(
            "Processed {}: {} pages, {} words",
            doc,
            report.stats.page_count,
            report.stats.word_count
        );

        Ok(DocumentResult { output, report })
    }

    /// Process documents and write each output.
    pub fn process_batch(&self, docs: &[String], writer: &dyn OutputWriter) -> BatchReport {
        self.process_batch_with(docs, writer, |_| {})
    }

    /// Process documents, write each output and call `on_done` as each finishes.
    ///
    /// Reports are returned in input order whatever the completion order.
    pub fn process_batch_with<F>(
        &self,
        docs: &[String],
        writer: &dyn OutputWriter,
        on_done: F,
    ) -> BatchReport
    where
        F: Fn(&DocumentReport) + Sync,
    {
        let started_at = Utc::now();
        let run = |doc: &String| {
            let report = self.process_and_write(doc, writer);
            on_done(&report);
            report
        };

        let reports: Vec<DocumentReport> = if self.options.parallel {
            docs.par_iter().map(run).collect()
        } else {
            docs.iter().map(run).collect()
        };

        let batch = BatchReport::new(started_at, Utc::now(), reports);
        log::info!(
            "Batch finished: {} succeeded, {} degraded, {} failed",
            batch.succeeded,
            batch.degraded,
            batch.failed
        );
        batch
    }

    fn process_and_write(&self, doc: &str, writer: &dyn OutputWriter) -> DocumentReport {
        match self.process_document(doc) {
            Ok(result) => {
                let mut report = result.report;
                if let Err(e) = writer.write(doc, &result.output) {
                    log::error!("Failed to write {}: {}", doc, e);
                    report.fail(e.to_string());
                }
                report
            }
            Err(e) => {
                log::error!("{}", e);
                DocumentReport::failed(doc, e.to_string())
            }
        }
    }

    /// Acquire raw text of every page from both sources.
    pub fn acquire(&self, doc: &str) -> Result<Vec<RawPage>> {
        let count = self.page_count(doc)?;
        let pages = if self.options.parallel {
            (1..=count)
                .into_par_iter()
                .map(|n| self.acquire_page(doc, n))
                .collect()
        } else {
            (1..=count).map(|n| self.acquire_page(doc, n)).collect()
        };
        Ok(pages)
    }

    fn page_count(&self, doc: &str) -> Result<u32> {
        let (native, ocr) = self.join(
            || self.native.page_count(doc),
            || self.ocr.page_count(doc),
        );
        match (native, ocr) {
            (Ok(a), Ok(b)) => {
                if a != b {
                    log::warn!(
                        "Page count mismatch for {}: native {}, ocr {}; using {}",
                        doc,
                        a,
                        b,
                        a.max(b)
                    );
                }
                Ok(a.max(b))
            }
            (Ok(count), Err(e)) | (Err(e), Ok(count)) => {
                log::warn!("{}; using {} pages for {}", e, count, doc);
                Ok(count)
            }
            (Err(a), Err(b)) => Err(Error::Document {
                id: doc.to_string(),
                reason: format!("no page count ({}; {})", a, b),
            }),
        }
    }

    fn acquire_page(&self, doc: &str, number: u32) -> RawPage {
        let (native, ocr) = self.join(
            || self.native.page_text(doc, number),
            || self.ocr.page_text(doc, number),
        );
        RawPage::new(number, ok_or_warn(doc, native), ok_or_warn(doc, ocr))
    }

    /// Normalize and reconcile acquired pages, in page order.
    pub fn reconcile_pages(&self, raw: &[RawPage]) -> (Vec<PageResult>, Vec<PageReport>) {
        let native_table = self
            .normalizer
            .frequency_table(raw.iter().map(|p| p.native.as_deref()));
        let ocr_table = self
            .normalizer
            .frequency_table(raw.iter().map(|p| p.ocr.as_deref()));

        let reconcile = |page: &RawPage| self.reconcile_page(page, &native_table, &ocr_table);
        let mut results: Vec<(PageResult, PageReport)> = if self.options.parallel {
            raw.par_iter().map(reconcile).collect()
        } else {
            raw.iter().map(reconcile).collect()
        };
        results.sort_by_key(|(page, _)| page.number);

        results.into_iter().unzip()
    }

    fn reconcile_page(
        &self,
        page: &RawPage,
        native_table: &LineFrequencyTable,
        ocr_table: &LineFrequencyTable,
    ) -> (PageResult, PageReport) {
        let clean = |text: Option<&str>, table: &LineFrequencyTable| {
            text.map(|t| self.normalizer.normalize_page(t, table))
                .unwrap_or_default()
        };
        let native = clean(page.native.as_deref(), native_table);
        let ocr = clean(page.ocr.as_deref(), ocr_table);

        let status = page.status();
        if status == PageStatus::BothMissing {
            log::warn!("Page {} has no text from either source", page.number);
        }

        let reconciliation = self.reconciler.reconcile(&native, &ocr);
        log::debug!("Page {}: {:?}", page.number, reconciliation.decision);

        (
            PageResult::new(page.number, reconciliation.text),
            PageReport {
                number: page.number,
                status,
                decision: reconciliation.decision,
            },
        )
    }

    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        if self.options.parallel {
            rayon::join(a, b)
        } else {
            (a(), b())
        }
    }
}

fn ok_or_warn(doc: &str, result: Result<String>) -> Option<String> {
    match result {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("Failed to acquire text for {}: {}", doc, e);
            None
        }
    }
}
