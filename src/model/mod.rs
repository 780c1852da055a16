//! Data types shared across the pipeline: pages, assembled output and
//! processing reports.

mod output;
mod page;
mod report;

pub use output::{page_header, Chunk, DocumentOutput, JsonFormat, CHUNK_SEPARATOR, PAGE_SEPARATOR};
pub use page::{PageResult, PageStatus, RawPage};
pub use report::{BatchReport, DocumentReport, DocumentStatus, PageReport, ReconcileStats};
