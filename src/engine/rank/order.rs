use crate::engine::aggregate::AggregatePlan;
use crate::engine::errors::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortField {
    Count,
    Sum(String),
    Mean(String),
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

/// Ordered list of sort keys. Entries that tie on every key are ordered by
/// group key, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    pub keys: Vec<SortKey>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desc(mut self, field: SortField) -> Self {
        self.keys.push(SortKey {
            field,
            direction: Direction::Descending,
        });
        self
    }

    pub fn asc(mut self, field: SortField) -> Self {
        self.keys.push(SortKey {
            field,
            direction: Direction::Ascending,
        });
        self
    }

    pub(crate) fn resolve(&self, plan: &AggregatePlan) -> Result<Vec<ResolvedKey>, PipelineError> {
        self.keys
            .iter()
            .map(|k| {
                let target = match &k.field {
                    SortField::Count => Target::Count,
                    SortField::Key => Target::Key,
                    SortField::Sum(name) => Target::Sum(lookup(plan, name)?),
                    SortField::Mean(name) => Target::Mean(lookup(plan, name)?),
                };
                Ok(ResolvedKey {
                    target,
                    direction: k.direction,
                })
            })
            .collect()
    }
}

fn lookup(plan: &AggregatePlan, name: &str) -> Result<usize, PipelineError> {
    plan.sum_index(name)
        .ok_or_else(|| PipelineError::UnknownSortField(name.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Count,
    Sum(usize),
    Mean(usize),
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedKey {
    pub target: Target,
    pub direction: Direction,
}
