//! Output writers: persist one artifact per document.

use crate::error::Result;
use crate::model::{DocumentOutput, JsonFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for written documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rendered plain text
    #[default]
    Text,

    /// JSON structure (pages or chunks)
    Json,
}

impl OutputFormat {
    /// File extension for this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }

    /// Serialize an output in this format.
    pub fn format(&self, output: &DocumentOutput) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(output.render()),
            OutputFormat::Json => output.to_json(JsonFormat::Pretty),
        }
    }
}

/// Trait for output writers.
///
/// Called from worker threads, one call per document.
pub trait OutputWriter: Send + Sync {
    /// Persist the output of one document.
    fn write(&self, doc: &str, output: &DocumentOutput) -> Result<()>;
}

/// Writer producing `<dir>/<doc>.txt` or `<dir>/<doc>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    dir: PathBuf,
    format: OutputFormat,
}

impl DirectoryWriter {
    /// Create a writer for `dir`, which is created on first write if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: OutputFormat::default(),
        }
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the artifact written for a document.
    pub fn path_for(&self, doc: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", doc, self.format.extension()))
    }
}

impl OutputWriter for DirectoryWriter {
    fn write(&self, doc: &str, output: &DocumentOutput) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = self.format.format(output)?;
        let path = self.path_for(doc);
        fs::write(&path, content)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}
