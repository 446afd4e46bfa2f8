use serde::Serialize;
use tracing::warn;

use super::filter_spec::FilterSpec;
use super::predicate::{parse_integer, parse_number};
use crate::engine::errors::RecordError;
use crate::engine::types::{Projection, RawRecord};

/// Diagnostic counters kept by a [`RecordFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub seen: u64,
    pub accepted: u64,
    /// Records dropped by a predicate or for lacking a required field.
    pub rejected: u64,
    pub malformed: u64,
}

impl FilterStats {
    pub fn absorb(&mut self, other: &FilterStats) {
        self.seen += other.seen;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.malformed += other.malformed;
    }
}

/// Applies a [`FilterSpec`] record by record.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    spec: FilterSpec,
    stats: FilterStats,
}

impl RecordFilter {
    pub fn new(spec: FilterSpec) -> Self {
        Self {
            spec,
            stats: FilterStats::default(),
        }
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Returns the projection of an accepted record, `Ok(None)` when a predicate
    /// drops it, and `Err` when it lacks a required field or holds an unreadable
    /// value. Only the counters change.
    pub fn apply(&mut self, record: &RawRecord) -> Result<Option<Projection>, RecordError> {
        self.stats.seen += 1;
        match self.evaluate(record) {
            Ok(Some(projection)) => {
                self.stats.accepted += 1;
                Ok(Some(projection))
            }
            Ok(None) => {
                self.stats.rejected += 1;
                Ok(None)
            }
            Err(err) => {
                match err {
                    RecordError::MissingField { .. } => self.stats.rejected += 1,
                    RecordError::Malformed { .. } => self.stats.malformed += 1,
                }
                warn!(
                    target: "retail_rank::filter",
                    error = %err,
                    record = ?record,
                    "Skipping record"
                );
                Err(err)
            }
        }
    }

    /// Counts a record that failed before it could be filtered (e.g. a short line).
    pub fn note_unreadable(&mut self) {
        self.stats.seen += 1;
        self.stats.malformed += 1;
    }

    fn evaluate(&self, record: &RawRecord) -> Result<Option<Projection>, RecordError> {
        if let Some(missing) = self.spec.required.iter().find(|f| !record.contains(f)) {
            return Err(RecordError::missing(missing));
        }

        for field in &self.spec.numeric {
            let value = record.get(field).ok_or_else(|| RecordError::missing(field))?;
            parse_number(field, value)?;
        }

        for field in &self.spec.integer {
            let value = record.get(field).ok_or_else(|| RecordError::missing(field))?;
            parse_integer(field, value)?;
        }

        for fp in &self.spec.predicates {
            if !fp.predicate.evaluate(&fp.field, record.get(&fp.field))? {
                return Ok(None);
            }
        }

        let mut projection = Projection::new();
        for field in &self.spec.extract {
            if let Some(value) = record.get(field) {
                projection.insert(field.as_str(), value);
            }
        }
        Ok(Some(projection))
    }
}
