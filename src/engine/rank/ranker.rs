use std::cmp::Ordering;

use tracing::debug;

use super::order::{Direction, OrderSpec, ResolvedKey, Target};
use super::ranked_entry::{RankedEntry, ResultList};
use crate::engine::aggregate::{AggregateState, StateTable};
use crate::engine::errors::PipelineError;
use crate::engine::types::GroupKey;

/// Sorts the table under `order` and keeps the first `bound` entries.
///
/// Keys are unique, so the trailing group-key comparison makes the order
/// total: the same table always ranks the same way, whatever the insertion
/// order of its buckets.
pub fn rank(table: &StateTable, order: &OrderSpec, bound: usize) -> Result<ResultList, PipelineError> {
    let keys = order.resolve(table.plan())?;
    let cmp = |a: &(&GroupKey, &AggregateState), b: &(&GroupKey, &AggregateState)| {
        compare(&keys, a, b)
    };

    let mut rows: Vec<(&GroupKey, &AggregateState)> = table.iter().collect();
    if bound == 0 {
        rows.clear();
    } else if bound < rows.len() {
        rows.select_nth_unstable_by(bound - 1, cmp);
        rows.truncate(bound);
    }
    rows.sort_by(cmp);

    debug!(
        target: "retail_rank::rank",
        groups = table.len(),
        kept = rows.len(),
        bound,
        "Ranked groups"
    );

    let plan = table.plan();
    Ok(ResultList::new(
        rows.into_iter()
            .map(|(key, state)| RankedEntry::from_state(plan, key.clone(), state))
            .collect(),
    ))
}

fn compare(
    keys: &[ResolvedKey],
    (ka, sa): &(&GroupKey, &AggregateState),
    (kb, sb): &(&GroupKey, &AggregateState),
) -> Ordering {
    for key in keys {
        let ord = match key.target {
            Target::Count => sa.count.cmp(&sb.count),
            Target::Sum(idx) => sa.sums[idx].cmp(&sb.sums[idx]),
            Target::Mean(idx) => sa.mean(idx).total_cmp(&sb.mean(idx)),
            Target::Key => ka.cmp(kb),
        };
        let ord = match key.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ka.cmp(kb)
}
