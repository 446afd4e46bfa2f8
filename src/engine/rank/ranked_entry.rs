use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::aggregate::{AggregatePlan, AggregateState};
use crate::engine::types::{Amount, GroupKey};

/// A finalized bucket, as handed to exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub key: GroupKey,
    pub count: u64,
    pub sums: IndexMap<String, Amount>,
    /// `sum / count` for every sum field.
    pub means: IndexMap<String, f64>,
    pub descriptive: IndexMap<String, String>,
}

impl RankedEntry {
    pub(crate) fn from_state(plan: &AggregatePlan, key: GroupKey, state: &AggregateState) -> Self {
        let mut sums = IndexMap::with_capacity(plan.sums.len());
        let mut means = IndexMap::with_capacity(plan.sums.len());
        for (idx, spec) in plan.sums.iter().enumerate() {
            if let Some(sum) = state.sums.get(idx) {
                sums.insert(spec.field.clone(), *sum);
                means.insert(spec.field.clone(), state.mean(idx));
            }
        }
        Self {
            key,
            count: state.count,
            sums,
            means,
            descriptive: state.descriptive.clone(),
        }
    }

    pub fn sum(&self, field: &str) -> Option<Amount> {
        self.sums.get(field).copied()
    }

    pub fn mean(&self, field: &str) -> Option<f64> {
        self.means.get(field).copied()
    }

    pub fn descriptive(&self, field: &str) -> Option<&str> {
        self.descriptive.get(field).map(String::as_str)
    }
}

/// The ranked, bounded output of one run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultList {
    entries: Vec<RankedEntry>,
}

impl ResultList {
    pub(crate) fn new(entries: Vec<RankedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&GroupKey> {
        self.entries.iter().map(|e| &e.key).collect()
    }
}

impl<'a> IntoIterator for &'a ResultList {
    type Item = &'a RankedEntry;
    type IntoIter = std::slice::Iter<'a, RankedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
