mod delimited;
mod kv_scan;

pub use delimited::{ColumnLayout, DelimitedSource};
pub use kv_scan::{
    KvScanSource, MemoryScan, ScanPort, ScanRow, ScanRows, decode_ignoring_invalid, decode_row,
    encode_row,
};

use crate::engine::errors::SourceError;
use crate::engine::types::RawRecord;

/// Anything yielding raw records one at a time. Record-level errors are
/// non-fatal; see [`SourceError::is_fatal`].
pub trait RecordSource: Iterator<Item = Result<RawRecord, SourceError>> {}

impl<T> RecordSource for T where T: Iterator<Item = Result<RawRecord, SourceError>> {}
