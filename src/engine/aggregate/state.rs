use indexmap::IndexMap;

use super::plan::{AggregatePlan, Contribution};
use crate::engine::types::Amount;

/// Running totals for one group key.
///
/// `sums` line up with `AggregatePlan::sums`. Descriptive fields are not
/// accumulated: the most recent merge wins. When two shards disagree on a
/// descriptive value for the same key, the shard merged last wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateState {
    pub count: u64,
    pub sums: Vec<Amount>,
    pub descriptive: IndexMap<String, String>,
}

impl AggregateState {
    pub fn zero(plan: &AggregatePlan) -> Self {
        Self {
            count: 0,
            sums: plan.sums.iter().map(|s| Amount::zero(s.scale)).collect(),
            descriptive: IndexMap::new(),
        }
    }

    /// Folds one record in. Returns `false`, leaving the state untouched, when a
    /// sum would overflow.
    pub fn absorb(&mut self, contribution: &Contribution) -> bool {
        let Some(sums) = add_all(&self.sums, &contribution.sums) else {
            return false;
        };
        self.sums = sums;
        self.count += 1;
        for (field, value) in &contribution.descriptive {
            self.descriptive.insert(field.clone(), value.clone());
        }
        true
    }

    /// Folds another partial state for the same key in. Same overflow contract
    /// as [`AggregateState::absorb`].
    pub fn merge(&mut self, other: &AggregateState) -> bool {
        let Some(sums) = add_all(&self.sums, &other.sums) else {
            return false;
        };
        self.sums = sums;
        self.count += other.count;
        for (field, value) in &other.descriptive {
            self.descriptive.insert(field.clone(), value.clone());
        }
        true
    }

    pub fn mean(&self, idx: usize) -> f64 {
        match self.sums.get(idx) {
            Some(sum) if self.count > 0 => sum.to_f64() / self.count as f64,
            _ => 0.0,
        }
    }
}

fn add_all(current: &[Amount], incoming: &[Amount]) -> Option<Vec<Amount>> {
    if current.len() != incoming.len() {
        return None;
    }
    current
        .iter()
        .zip(incoming)
        .map(|(a, b)| a.checked_add(*b))
        .collect()
}
