use std::collections::HashMap;
use std::collections::hash_map::Entry;

use ahash::RandomState as AHashRandomState;

use super::plan::{AggregatePlan, Contribution};
use super::state::AggregateState;
use crate::engine::errors::{PipelineError, RecordError};
use crate::engine::types::{GroupKey, Projection};

/// Group key to running state, for one shard or for the merged result.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTable {
    plan: AggregatePlan,
    groups: HashMap<GroupKey, AggregateState, AHashRandomState>,
}

impl StateTable {
    pub fn new(plan: AggregatePlan) -> Self {
        Self {
            plan,
            groups: HashMap::with_hasher(AHashRandomState::new()),
        }
    }

    pub fn plan(&self) -> &AggregatePlan {
        &self.plan
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AggregateState> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &AggregateState)> {
        self.groups.iter()
    }

    /// Parses a projection and merges it under its group key.
    pub fn merge_projection(&mut self, projection: &Projection) -> Result<(), RecordError> {
        let (key, contribution) = Contribution::from_projection(&self.plan, projection)?;
        self.merge(key, &contribution)
    }

    /// Folds one contribution into the bucket for `key`, creating a zeroed
    /// bucket on first sight. On error the table is left exactly as it was.
    pub fn merge(&mut self, key: GroupKey, contribution: &Contribution) -> Result<(), RecordError> {
        let absorbed = match self.groups.entry(key) {
            Entry::Occupied(mut e) => e.get_mut().absorb(contribution),
            Entry::Vacant(e) => {
                let mut state = AggregateState::zero(&self.plan);
                let ok = state.absorb(contribution);
                if ok {
                    e.insert(state);
                }
                ok
            }
        };
        if absorbed {
            Ok(())
        } else {
            Err(RecordError::malformed(
                "<sums>",
                &format!("{:?}", contribution.sums),
                "running total would overflow",
            ))
        }
    }

    /// Combines a partial table from another shard into this one.
    ///
    /// Counts and sums add, so any split of the input merged in any order gives
    /// the same totals as a single pass. Descriptive fields from `other` win.
    /// Every merged bucket is computed before any is stored, so on overflow the
    /// table is left exactly as it was.
    pub fn merge_partial(&mut self, other: StateTable) -> Result<(), PipelineError> {
        if other.plan != self.plan {
            return Err(PipelineError::PlanMismatch);
        }
        let mut staged = Vec::with_capacity(other.groups.len());
        for (key, state) in other.groups {
            let merged = match self.groups.get(&key) {
                Some(current) => {
                    let mut merged = current.clone();
                    if !merged.merge(&state) {
                        return Err(PipelineError::Overflow(key.to_string()));
                    }
                    merged
                }
                None => state,
            };
            staged.push((key, merged));
        }
        self.groups.extend(staged);
        Ok(())
    }

    /// Makes sure `key` is reported even if no record contributed to it.
    pub fn ensure_key(&mut self, key: GroupKey) {
        let plan = &self.plan;
        self.groups
            .entry(key)
            .or_insert_with(|| AggregateState::zero(plan));
    }
}
