use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::engine::errors::ExportError;
use crate::engine::export::columns::{Schema, render_rows};
use crate::engine::export::exporter::Exporter;
use crate::engine::rank::ResultList;

/// Writes a header row followed by one row per entry.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    schema: Schema,
}

impl CsvExporter<File> {
    pub fn create(path: impl AsRef<Path>, schema: Schema) -> Result<Self, ExportError> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(file, schema))
    }
}

impl<W: Write> CsvExporter<W> {
    pub fn new(output: W, schema: Schema) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(output),
            schema,
        }
    }

    pub fn with_delimiter(output: W, delimiter: u8, schema: Schema) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(output),
            schema,
        }
    }

    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

impl<W: Write> Exporter for CsvExporter<W> {
    fn export(&mut self, list: &ResultList) -> Result<(), ExportError> {
        self.writer.write_record(self.schema.headers())?;
        for row in render_rows(&self.schema, list) {
            self.writer.write_record(&row)?;
        }
        self.writer.flush()?;
        info!(target: "retail_rank::export", rows = list.len(), "Wrote result table");
        Ok(())
    }
}
