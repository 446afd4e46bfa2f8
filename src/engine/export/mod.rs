mod columns;
mod csv_exporter;
mod exporter;
pub mod series;

pub use columns::{Column, Schema, render_rows};
pub use csv_exporter::CsvExporter;
pub use exporter::{Exporter, MemoryExporter};
pub use series::{Series, count_by_key, total_by, write_series_csv};

#[cfg(test)]
mod series_test;
