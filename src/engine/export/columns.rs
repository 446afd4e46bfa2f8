use crate::engine::rank::{RankedEntry, ResultList};

/// A value taken from a ranked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Component `i` of the group key.
    Key(usize),
    Count,
    Sum(String),
    Mean(String),
    Descriptive(String),
}

impl Column {
    pub fn default_header(&self) -> String {
        match self {
            Column::Key(0) => "key".to_string(),
            Column::Key(i) => format!("key_{i}"),
            Column::Count => "count".to_string(),
            Column::Sum(field) => field.clone(),
            Column::Mean(field) => format!("mean_{field}"),
            Column::Descriptive(field) => field.clone(),
        }
    }

    /// Renders the cell for `entry`. Absent values render empty.
    pub fn render(&self, entry: &RankedEntry) -> String {
        match self {
            Column::Key(i) => entry.key.part(*i).unwrap_or_default().to_string(),
            Column::Count => entry.count.to_string(),
            Column::Sum(field) => entry.sum(field).map(|s| s.to_string()).unwrap_or_default(),
            Column::Mean(field) => entry
                .mean(field)
                .map(|m| format!("{m:.2}"))
                .unwrap_or_default(),
            Column::Descriptive(field) => entry.descriptive(field).unwrap_or_default().to_string(),
        }
    }
}

/// Ordered, headed columns of a tabular export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(String, Column)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, header: impl Into<String>, column: Column) -> Self {
        self.columns.push((header.into(), column));
        self
    }

    /// Adds `column` under its default header.
    pub fn with(self, column: Column) -> Self {
        let header = column.default_header();
        self.column(header, column)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|(h, _)| h.as_str()).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One row per entry, in list order.
pub fn render_rows(schema: &Schema, list: &ResultList) -> Vec<Vec<String>> {
    list.iter()
        .map(|entry| schema.columns().map(|c| c.render(entry)).collect())
        .collect()
}
