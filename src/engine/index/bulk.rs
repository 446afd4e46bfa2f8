use std::io::Write;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::engine::errors::{PipelineError, SinkError, SourceError};
use crate::engine::index::document::{Document, to_document};
use crate::engine::index::mapping::IndexMapping;
use crate::engine::source::RecordSource;

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// A document the sink refused, by position within its batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub position: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkResponse {
    pub indexed: usize,
    pub failures: Vec<DocumentFailure>,
}

/// Narrow port onto a search index's bulk API.
///
/// `Err` means the whole batch could not be delivered; refusals of single
/// documents come back in [`BulkResponse::failures`].
pub trait BulkIndexPort {
    fn bulk_index(&mut self, index: &str, batch: &[Document]) -> Result<BulkResponse, SinkError>;
}

/// Index names must be non-empty lowercase text without whitespace and may not
/// start with `-`, `_` or `+`. A batch for any other name is refused whole.
pub fn check_index_name(index: &str) -> Result<(), SinkError> {
    let valid = !index.is_empty()
        && !index.starts_with(['-', '_', '+'])
        && !index.chars().any(|c| c.is_uppercase() || c.is_whitespace());
    if valid {
        Ok(())
    } else {
        Err(SinkError::Rejected(format!("invalid index name {index:?}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub records_read: u64,
    pub malformed: u64,
    pub batches: u64,
    pub indexed: u64,
    pub failed: u64,
}

/// Streams records into an index in fixed-size batches.
#[derive(Debug, Clone)]
pub struct BulkLoader {
    index: String,
    batch_size: usize,
}

impl BulkLoader {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Types and sends every record. Malformed records are logged and
    /// skipped; a source or sink failure aborts the load.
    pub fn load<S, P>(
        &self,
        records: S,
        mapping: &IndexMapping,
        port: &mut P,
    ) -> Result<LoadSummary, PipelineError>
    where
        S: RecordSource,
        P: BulkIndexPort + ?Sized,
    {
        let mut summary = LoadSummary::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for item in records {
            summary.records_read += 1;
            let record = match item {
                Ok(record) => record,
                Err(SourceError::Record(err)) => {
                    summary.malformed += 1;
                    warn!(target: "retail_rank::index", error = %err, "Skipping unreadable record");
                    continue;
                }
                Err(err) => return Err(PipelineError::Source(err)),
            };
            match to_document(mapping, &record) {
                Ok(doc) => batch.push(doc),
                Err(err) => {
                    summary.malformed += 1;
                    warn!(target: "retail_rank::index", error = %err, "Skipping untypable record");
                    continue;
                }
            }
            if batch.len() == self.batch_size {
                self.flush(&mut batch, port, &mut summary)?;
            }
        }
        if !batch.is_empty() {
            self.flush(&mut batch, port, &mut summary)?;
        }

        info!(
            target: "retail_rank::index",
            index = %self.index,
            batches = summary.batches,
            indexed = summary.indexed,
            failed = summary.failed,
            malformed = summary.malformed,
            "Bulk load finished"
        );
        Ok(summary)
    }

    fn flush<P: BulkIndexPort + ?Sized>(
        &self,
        batch: &mut Vec<Document>,
        port: &mut P,
        summary: &mut LoadSummary,
    ) -> Result<(), PipelineError> {
        summary.batches += 1;
        let response = port.bulk_index(&self.index, batch)?;
        for failure in &response.failures {
            warn!(
                target: "retail_rank::index",
                batch = summary.batches,
                position = failure.position,
                reason = %failure.reason,
                "Document rejected by index"
            );
        }
        summary.indexed += response.indexed as u64;
        summary.failed += response.failures.len() as u64;
        info!(
            target: "retail_rank::index",
            batch = summary.batches,
            size = batch.len(),
            "Batch sent"
        );
        batch.clear();
        Ok(())
    }
}

/// Writes the newline-delimited bulk request body instead of sending it.
pub struct NdjsonBulkWriter<W: Write> {
    output: W,
}

impl<W: Write> NdjsonBulkWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> BulkIndexPort for NdjsonBulkWriter<W> {
    fn bulk_index(&mut self, index: &str, batch: &[Document]) -> Result<BulkResponse, SinkError> {
        check_index_name(index)?;
        let action = json!({ "index": { "_index": index } });
        for doc in batch {
            serde_json::to_writer(&mut self.output, &action)?;
            self.output.write_all(b"\n")?;
            serde_json::to_writer(&mut self.output, doc)?;
            self.output.write_all(b"\n")?;
        }
        self.output.flush()?;
        Ok(BulkResponse {
            indexed: batch.len(),
            failures: Vec::new(),
        })
    }
}

/// In-memory index. Documents lacking `required` (when set) are refused.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    pub batches: Vec<(String, Vec<Document>)>,
    required: Option<String>,
    unavailable: bool,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requiring(field: &str) -> Self {
        Self {
            required: Some(field.to_string()),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.batches.iter().flat_map(|(_, docs)| docs.iter())
    }
}

impl BulkIndexPort for MemoryIndex {
    fn bulk_index(&mut self, index: &str, batch: &[Document]) -> Result<BulkResponse, SinkError> {
        if self.unavailable {
            return Err(SinkError::Unavailable(format!("index {index} unreachable")));
        }
        check_index_name(index)?;
        let mut response = BulkResponse::default();
        let mut accepted = Vec::with_capacity(batch.len());
        for (position, doc) in batch.iter().enumerate() {
            let refused = self
                .required
                .as_deref()
                .is_some_and(|field| doc.get(field).is_none_or(|v| v.is_null()));
            if refused {
                response.failures.push(DocumentFailure {
                    position,
                    reason: "missing required field".to_string(),
                });
            } else {
                accepted.push(doc.clone());
            }
        }
        response.indexed = accepted.len();
        self.batches.push((index.to_string(), accepted));
        Ok(response)
    }
}
