use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ErrorKind, StringRecord};

use crate::engine::errors::{RecordError, SourceError};
use crate::engine::types::RawRecord;

/// How field names are assigned to the cells of each line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLayout {
    /// The first line names the columns.
    Header,
    /// Known column order, no header line.
    Fixed(Vec<String>),
}

/// Line-delimited, field-separated records (`,`, `;` or tab).
///
/// Blank lines are skipped. Cells are trimmed. Under a header layout a short
/// line simply lacks its trailing fields; under a fixed layout it is reported
/// as malformed. Both are non-fatal, an I/O failure is not.
pub struct DelimitedSource<R: Read> {
    reader: csv::Reader<R>,
    columns: Vec<String>,
    fixed: bool,
    delimiter: u8,
}

impl DelimitedSource<File> {
    pub fn from_path(
        path: impl AsRef<Path>,
        delimiter: u8,
        layout: ColumnLayout,
    ) -> Result<Self, SourceError> {
        let file = File::open(path.as_ref())?;
        Self::new(file, delimiter, layout)
    }
}

impl<R: Read> DelimitedSource<R> {
    pub fn new(input: R, delimiter: u8, layout: ColumnLayout) -> Result<Self, SourceError> {
        let fixed = matches!(layout, ColumnLayout::Fixed(_));
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(!fixed)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let columns = match layout {
            ColumnLayout::Fixed(columns) => columns,
            ColumnLayout::Header => reader.headers()?.iter().map(str::to_string).collect(),
        };

        Ok(Self {
            reader,
            columns,
            fixed,
            delimiter,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn build(&self, row: &StringRecord) -> Result<RawRecord, SourceError> {
        if self.fixed && row.len() < self.columns.len() {
            let line = row
                .iter()
                .collect::<Vec<_>>()
                .join(&(self.delimiter as char).to_string());
            let at = row.position().map(|p| p.line()).unwrap_or_default();
            return Err(RecordError::malformed(
                &format!("line {at}"),
                &line,
                format!("expected {} fields, found {}", self.columns.len(), row.len()),
            )
            .into());
        }
        Ok(RawRecord::from_pairs(
            self.columns.iter().cloned().zip(row.iter().map(str::to_string)),
        ))
    }
}

impl<R: Read> Iterator for DelimitedSource<R> {
    type Item = Result<RawRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();
        loop {
            match self.reader.read_record(&mut row) {
                Ok(false) => return None,
                Ok(true) if is_blank(&row) => continue,
                Ok(true) => return Some(self.build(&row)),
                Err(err) => return Some(Err(classify(err))),
            }
        }
    }
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(str::is_empty)
}

fn classify(err: csv::Error) -> SourceError {
    match err.kind() {
        ErrorKind::Utf8 { pos, err: utf8 } => {
            let at = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            RecordError::malformed(&format!("line {at}"), "", utf8.to_string()).into()
        }
        _ => err.into(),
    }
}
