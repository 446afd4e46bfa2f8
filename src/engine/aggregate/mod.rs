mod plan;
mod state;
mod table;

pub use plan::{AggregatePlan, Contribution, KeyPart, SumSpec, year_key};
pub use state::AggregateState;
pub use table::StateTable;
