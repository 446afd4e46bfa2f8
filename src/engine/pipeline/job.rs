use crate::engine::aggregate::AggregatePlan;
use crate::engine::errors::SampleError;
use crate::engine::filter::FilterSpec;
use crate::engine::rank::OrderSpec;
use crate::engine::sample::SampleSpec;
use crate::engine::types::GroupKey;

/// Declarative description of one batch job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub name: String,
    pub filter: FilterSpec,
    pub plan: AggregatePlan,
    pub order: OrderSpec,
    /// Maximum number of ranked entries kept.
    pub bound: usize,
    /// Drawn from the ranked list when set.
    pub sample: Option<SampleSpec>,
    /// Keys reported with zeroed state when no record reached them.
    pub seed_keys: Vec<GroupKey>,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, filter: FilterSpec, plan: AggregatePlan) -> Self {
        Self {
            name: name.into(),
            filter,
            plan,
            order: OrderSpec::new(),
            bound: usize::MAX,
            sample: None,
            seed_keys: Vec::new(),
        }
    }

    pub fn order_by(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    pub fn bounded(mut self, bound: usize) -> Self {
        self.bound = bound;
        self
    }

    pub fn sampled(mut self, fraction: f64, seed: u64) -> Self {
        self.sample = Some(SampleSpec { fraction, seed });
        self
    }

    /// Checks the settings that would otherwise only fail after aggregation.
    pub fn validate(&self) -> Result<(), SampleError> {
        match &self.sample {
            Some(spec) => spec.validate(),
            None => Ok(()),
        }
    }

    pub fn seed_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = GroupKey>,
    {
        self.seed_keys.extend(keys);
        self
    }
}
