mod job;
mod runner;
mod summary;

pub use job::JobSpec;
pub use runner::{Pipeline, ShardOutput};
pub use summary::{RunReport, RunSummary};
