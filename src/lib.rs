//! # pagemerge
//!
//! Reconciles two text extractions of the same document, one from the
//! embedded text layer and one from OCR of the rendered pages, into a single
//! cleaned text per page, then assembles the pages into a paged or
//! sentence-preserving chunked output.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagemerge::source::{FormFeedSource, SourceKind};
//! use pagemerge::{DirectoryWriter, Pipeline, PipelineOptions};
//! use std::sync::Arc;
//!
//! fn main() -> pagemerge::Result<()> {
//!     let native = Arc::new(FormFeedSource::new("input", "native", SourceKind::Native));
//!     let ocr = Arc::new(FormFeedSource::new("input", "ocr", SourceKind::Ocr));
//!     let pipeline = Pipeline::new(PipelineOptions::new().chunked(100), native, ocr)?;
//!
//!     let result = pipeline.process_document("lecture01")?;
//!     println!("{}", result.output.render());
//!
//!     let writer = DirectoryWriter::new("input/output_txt");
//!     let batch = pipeline.process_batch(&["lecture01".to_string()], &writer);
//!     println!("{} failed", batch.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Similarity-gated merge**: native text is trusted when both sources
//!   agree; OCR-only sentences (captions, diagram labels) are appended otherwise
//! - **Notation-aware cleanup**: Greek letters and math operators survive,
//!   OCR noise, page numbers and running headers/footers do not
//! - **Sentence integrity**: no chunk ever ends mid-sentence
//! - **Degraded sources**: a failing source falls back to the other one
//! - **Parallel processing**: Uses Rayon across pages and documents

pub mod assemble;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod reconcile;
pub mod source;
pub mod text;

// Re-export commonly used types
pub use assemble::{assemble, AssemblyMode};
pub use error::{Error, Result};
pub use model::{
    BatchReport, Chunk, DocumentOutput, DocumentReport, DocumentStatus, JsonFormat, PageReport,
    PageResult, PageStatus, RawPage, ReconcileStats,
};
pub use output::{DirectoryWriter, OutputFormat, OutputWriter};
pub use pipeline::{DocumentResult, Pipeline, PipelineOptions};
pub use reconcile::{reconcile, Decision, Reconciler, Reconciliation};
pub use source::{SourceKind, TextSource};
pub use text::{normalize, segment, similarity, NormalizeOptions, Normalizer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalize and reconcile one page given as two raw strings.
///
/// # Example
///
/// ```
/// let merged = pagemerge::reconcile_raw(
///     "Theorem 1 holds.\n12",
///     "Theorem 1 holds. See Figure 3 for details.",
///     0.8,
/// );
/// assert_eq!(merged.text, "Theorem 1 holds. See Figure 3 for details.");
/// ```
pub fn reconcile_raw(native: &str, ocr: &str, threshold: f64) -> Reconciliation {
    Reconciler::new(threshold).reconcile(&normalize(native), &normalize(ocr))
}
