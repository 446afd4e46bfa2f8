mod bulk;
mod document;
mod mapping;

pub use bulk::{
    BulkIndexPort, BulkLoader, BulkResponse, DEFAULT_BATCH_SIZE, DocumentFailure, LoadSummary,
    MemoryIndex, NdjsonBulkWriter, check_index_name,
};
pub use document::{Document, to_document};
pub use mapping::{FieldType, IndexMapping};
