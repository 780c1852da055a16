//! Pipeline options and validation.

use crate::assemble::{AssemblyMode, DEFAULT_CHUNK_TARGET_WORDS};
use crate::error::{Error, Result};
use crate::reconcile::DEFAULT_SIMILARITY_THRESHOLD;
use crate::text::NormalizeOptions;

/// Options for a reconciliation run.
///
/// Validated once by [`crate::Pipeline::new`], before any page is processed.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Output layout
    pub mode: AssemblyMode,

    /// Word target per chunk (chunked mode only)
    pub chunk_target_words: usize,

    /// Agreement threshold in `(0, 1)`
    pub similarity_threshold: f64,

    /// Whether to process pages and documents in parallel
    pub parallel: bool,

    /// Whether to remove running headers and footers
    pub remove_boilerplate: bool,

    /// Minimum number of pages before header/footer detection applies
    pub boilerplate_min_pages: usize,

    /// A line is a header/footer when it appears on more than this share of pages
    pub boilerplate_min_share: f64,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output layout.
    pub fn with_mode(mut self, mode: AssemblyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Paged output.
    pub fn paged(mut self) -> Self {
        self.mode = AssemblyMode::Paged;
        self
    }

    /// Chunked output with the given word target.
    pub fn chunked(mut self, target_words: usize) -> Self {
        self.mode = AssemblyMode::Chunked;
        self.chunk_target_words = target_words;
        self
    }

    /// Set chunk word target.
    pub fn with_chunk_target_words(mut self, words: usize) -> Self {
        self.chunk_target_words = words;
        self
    }

    /// Set agreement threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable header/footer removal.
    pub fn with_boilerplate_removal(mut self, remove: bool) -> Self {
        self.remove_boilerplate = remove;
        self
    }

    /// Set header/footer detection thresholds.
    pub fn with_boilerplate_thresholds(mut self, min_pages: usize, min_share: f64) -> Self {
        self.boilerplate_min_pages = min_pages;
        self.boilerplate_min_share = min_share;
        self
    }

    /// Check every value, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_target_words == 0 {
            return Err(Error::InvalidConfig(
                "chunk_target_words must be positive".into(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "similarity_threshold must be in (0, 1), got {}",
                self.similarity_threshold
            )));
        }
        if self.boilerplate_min_pages == 0 {
            return Err(Error::InvalidConfig(
                "boilerplate_min_pages must be at least 1".into(),
            ));
        }
        if !(self.boilerplate_min_share > 0.0 && self.boilerplate_min_share < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "boilerplate_min_share must be in (0, 1), got {}",
                self.boilerplate_min_share
            )));
        }
        Ok(())
    }

    /// Normalizer options derived from these settings.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::new()
            .with_boilerplate_removal(self.remove_boilerplate)
            .with_boilerplate_thresholds(self.boilerplate_min_pages, self.boilerplate_min_share)
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            mode: AssemblyMode::Chunked,
            chunk_target_words: DEFAULT_CHUNK_TARGET_WORDS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            parallel: true,
            remove_boilerplate: true,
            boilerplate_min_pages: 3,
            boilerplate_min_share: 0.5,
        }
    }
}
