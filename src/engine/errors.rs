use std::io;
use thiserror::Error;
use tracing::{debug, error};

use crate::engine::pipeline::RunReport;

/// Per-record problems. Never fatal: the record is logged, counted and skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("malformed field {field}={value:?}: {reason}")]
    Malformed {
        field: String,
        value: String,
        reason: String,
    },
}

impl RecordError {
    pub fn missing(field: &str) -> Self {
        RecordError::MissingField {
            field: field.to_string(),
        }
    }

    pub fn malformed(field: &str, value: &str, reason: impl Into<String>) -> Self {
        RecordError::Malformed {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while pulling records out of a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("delimited read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("connection error: {0}")]
    Connection(String),
}

impl SourceError {
    /// Only record-level problems let the run continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SourceError::Record(_))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("sample fraction must be within [0, 1], got {0}")]
    InvalidFraction(f64),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("series total overflowed: {0}")]
    Overflow(String),
}

/// Errors reported by a bulk index sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("batch rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source failed: {0}")]
    Source(SourceError),

    #[error("sample failed: {0}")]
    Sample(#[from] SampleError),

    #[error("partial aggregates were built from different plans")]
    PlanMismatch,

    #[error("running totals for key {0} overflowed while merging shards")]
    Overflow(String),

    #[error("cannot order by unknown sum field: {0}")]
    UnknownSortField(String),

    #[error("sink failed: {0}")]
    Sink(#[from] SinkError),

    #[error("export failed after {} results were computed: {error}", .report.results.len())]
    Export {
        error: ExportError,
        report: Box<RunReport>,
    },
}

impl PipelineError {
    pub fn log_error(&self) {
        match self {
            PipelineError::Source(e) => {
                error!("Source failed: {}", e);
                debug!("Source error details: {:?}", e);
            }
            PipelineError::Sample(e) => {
                error!("Sampling failed: {}", e);
            }
            PipelineError::PlanMismatch => {
                error!("Refusing to merge partial aggregates built from different plans");
            }
            PipelineError::Overflow(key) => {
                error!("Totals for key {} overflowed during shard merge", key);
            }
            PipelineError::UnknownSortField(field) => {
                error!("Cannot order by unknown sum field {}", field);
            }
            PipelineError::Sink(e) => {
                error!("Sink failed: {}", e);
                debug!("Sink error details: {:?}", e);
            }
            PipelineError::Export { error, report } => {
                error!(
                    "Export failed with {} computed results: {}",
                    report.results.len(),
                    error
                );
                debug!("Export error details: {:?}", error);
            }
        }
    }
}
