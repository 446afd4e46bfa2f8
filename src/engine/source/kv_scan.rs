use tracing::debug;

use crate::engine::errors::SourceError;
use crate::engine::types::RawRecord;

/// One logical row of a key-value scan: `"<family>:<qualifier>"` byte keys to
/// byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRow {
    pub row_key: Vec<u8>,
    pub cells: Vec<(Vec<u8>, Vec<u8>)>,
}

pub type ScanRows<'a> = Box<dyn Iterator<Item = Result<ScanRow, SourceError>> + 'a>;

/// Narrow port onto a sorted key-value store.
pub trait ScanPort {
    fn scan(&mut self) -> Result<ScanRows<'_>, SourceError>;
}

/// Adapts a [`ScanPort`] into a record source.
pub struct KvScanSource<'a> {
    rows: ScanRows<'a>,
    family: Option<String>,
}

impl<'a> KvScanSource<'a> {
    /// Starts a scan. With `family` set, cells of other column families are
    /// ignored.
    pub fn open<P: ScanPort>(port: &'a mut P, family: Option<&str>) -> Result<Self, SourceError> {
        debug!(target: "retail_rank::source", family = ?family, "Opening key-value scan");
        Ok(Self {
            rows: port.scan()?,
            family: family.map(str::to_string),
        })
    }
}

impl Iterator for KvScanSource<'_> {
    type Item = Result<RawRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.map(|r| decode_row(&r, self.family.as_deref())))
    }
}

/// Turns the cells of a row into a record keyed by column qualifier.
pub fn decode_row(row: &ScanRow, family: Option<&str>) -> RawRecord {
    let mut record = RawRecord::new();
    for (key, value) in &row.cells {
        let key = decode_ignoring_invalid(key);
        let (cell_family, qualifier) = match key.split_once(':') {
            Some((f, q)) => (Some(f), q),
            None => (None, key.as_str()),
        };
        if family.is_some() && cell_family != family {
            continue;
        }
        record.insert(qualifier, decode_ignoring_invalid(value));
    }
    record
}

/// UTF-8 decode that drops invalid byte sequences instead of replacing them.
pub fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Builds the row written for `record` when loading the store: every field
/// becomes `family:field`.
pub fn encode_row(row_key: &str, family: &str, record: &RawRecord) -> ScanRow {
    ScanRow {
        row_key: row_key.as_bytes().to_vec(),
        cells: record
            .iter()
            .map(|(field, value)| {
                (
                    format!("{family}:{field}").into_bytes(),
                    value.as_bytes().to_vec(),
                )
            })
            .collect(),
    }
}

/// In-memory store used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScan {
    rows: Vec<ScanRow>,
    fail_after: Option<usize>,
    unreachable: bool,
}

impl MemoryScan {
    pub fn new(rows: Vec<ScanRow>) -> Self {
        Self {
            rows,
            fail_after: None,
            unreachable: false,
        }
    }

    /// Simulates a dropped connection after `n` rows.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Simulates a store that refuses the scan.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn put(&mut self, row: ScanRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ScanRow] {
        &self.rows
    }
}

impl ScanPort for MemoryScan {
    fn scan(&mut self) -> Result<ScanRows<'_>, SourceError> {
        if self.unreachable {
            return Err(SourceError::Connection("store unreachable".into()));
        }
        let mut rows: Vec<&ScanRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.row_key.cmp(&b.row_key));

        let limit = self.fail_after;
        Ok(Box::new(rows.into_iter().enumerate().map_while(
            move |(i, row)| match limit {
                Some(n) if i > n => None,
                Some(n) if i == n => Some(Err(SourceError::Connection(format!(
                    "connection lost after {n} rows"
                )))),
                _ => Some(Ok(row.clone())),
            },
        )))
    }
}
