use crate::engine::aggregate::{AggregatePlan, StateTable};
use crate::engine::types::{MONEY_SCALE, RawRecord};

use super::raw_record_factory::RawRecordFactory;

/// Builds state tables keyed by order code with quantity and stamp totals.
pub struct StateTableFactory {
    plan: AggregatePlan,
    records: Vec<RawRecord>,
}

impl StateTableFactory {
    pub fn new() -> Self {
        Self {
            plan: Self::order_plan(),
            records: Vec::new(),
        }
    }

    pub fn order_plan() -> AggregatePlan {
        AggregatePlan::keyed_by("codcde")
            .sum("qte", 0)
            .sum("timbrecde", MONEY_SCALE)
            .describe(["villecli"])
    }

    pub fn with_plan(mut self, plan: AggregatePlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_order(mut self, city: &str, qte: &str, timbre: &str, codcde: &str) -> Self {
        self.records
            .push(RawRecordFactory::order(city, qte, timbre, codcde));
        self
    }

    pub fn with_record(mut self, record: RawRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn create(self) -> StateTable {
        let mut table = StateTable::new(self.plan);
        for record in &self.records {
            table
                .merge_projection(record)
                .expect("factory records must merge");
        }
        table
    }
}
