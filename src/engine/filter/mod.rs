mod filter_spec;
mod predicate;
mod record_filter;

pub use filter_spec::{FieldPredicate, FilterSpec};
pub use predicate::{Predicate, year_of};
pub use record_filter::{FilterStats, RecordFilter};

#[cfg(test)]
mod predicate_test;
