mod order;
mod ranked_entry;
mod ranker;

pub use order::{Direction, OrderSpec, SortField, SortKey};
pub use ranked_entry::{RankedEntry, ResultList};
pub use ranker::rank;
