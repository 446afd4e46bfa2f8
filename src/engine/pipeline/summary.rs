use std::fmt;

use serde::Serialize;

use crate::engine::filter::FilterStats;
use crate::engine::rank::ResultList;

/// Per-run counters, always reported whether or not export succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub records_read: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub malformed: u64,
    /// Distinct keys that received at least one record.
    pub keys_aggregated: u64,
    pub results: u64,
}

impl RunSummary {
    pub(crate) fn from_stats(stats: &FilterStats, keys_aggregated: usize, results: usize) -> Self {
        Self {
            records_read: stats.seen,
            accepted: stats.accepted,
            rejected: stats.rejected,
            malformed: stats.malformed,
            keys_aggregated: keys_aggregated as u64,
            results: results as u64,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={} accepted={} rejected={} malformed={} keys={} results={}",
            self.records_read,
            self.accepted,
            self.rejected,
            self.malformed,
            self.keys_aggregated,
            self.results
        )
    }
}

/// Outcome of a finalized run: the list handed to the exporter and its
/// counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub job: String,
    pub summary: RunSummary,
    pub results: ResultList,
}
