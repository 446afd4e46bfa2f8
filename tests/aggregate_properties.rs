use proptest::prelude::*;

use retail_rank::engine::aggregate::AggregatePlan;
use retail_rank::engine::errors::SourceError;
use retail_rank::engine::filter::FilterSpec;
use retail_rank::engine::pipeline::{JobSpec, Pipeline};
use retail_rank::engine::rank::{OrderSpec, SortField, rank};
use retail_rank::engine::sample::sample;
use retail_rank::engine::types::{MONEY_SCALE, RawRecord};

fn job(bound: usize) -> JobSpec {
    JobSpec::new(
        "props",
        FilterSpec::new().require(["codcde"]),
        AggregatePlan::keyed_by("codcde")
            .sum("qte", 0)
            .sum("timbrecde", MONEY_SCALE),
    )
    .order_by(
        OrderSpec::new()
            .desc(SortField::Sum("qte".into()))
            .desc(SortField::Sum("timbrecde".into())),
    )
    .bounded(bound)
}

fn record() -> impl Strategy<Value = RawRecord> {
    (0u8..12, 0u32..500, 0u32..100_000).prop_map(|(code, qte, cents)| {
        RawRecord::from_pairs([
            ("codcde", format!("C{code}")),
            ("qte", qte.to_string()),
            ("timbrecde", format!("{}.{:02}", cents / 100, cents % 100)),
        ])
    })
}

fn source(records: &[RawRecord]) -> std::vec::IntoIter<Result<RawRecord, SourceError>> {
    records.iter().cloned().map(Ok).collect::<Vec<_>>().into_iter()
}

proptest! {
    #[test]
    fn any_split_merges_to_the_single_pass_totals(
        records in prop::collection::vec(record(), 0..60),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let pipeline = Pipeline::new(job(usize::MAX));
        let whole = pipeline.aggregate_shard(source(&records)).unwrap();

        let mut bounds: Vec<usize> = cuts.iter().map(|c| c.index(records.len() + 1)).collect();
        bounds.push(0);
        bounds.push(records.len());
        bounds.sort_unstable();

        let shards = bounds
            .windows(2)
            .rev()
            .map(|w| pipeline.aggregate_shard(source(&records[w[0]..w[1]])).unwrap())
            .collect();
        let merged = pipeline.merge_shards(shards).unwrap();

        prop_assert_eq!(merged.stats, whole.stats);
        prop_assert_eq!(merged.table.len(), whole.table.len());
        for (key, state) in whole.table.iter() {
            let other = merged.table.get(key).unwrap();
            prop_assert_eq!(other.count, state.count);
            prop_assert_eq!(&other.sums, &state.sums);
        }
    }

    #[test]
    fn ranking_is_deterministic_and_bounded(
        records in prop::collection::vec(record(), 0..60),
        bound in 0usize..15,
    ) {
        let pipeline = Pipeline::new(job(usize::MAX));
        let table = pipeline.aggregate_shard(source(&records)).unwrap().table;
        let order = pipeline.job().order.clone();

        let first = rank(&table, &order, bound).unwrap();
        let second = rank(&table.clone(), &order, bound).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), bound.min(table.len()));
    }

    #[test]
    fn sampling_is_reproducible(
        records in prop::collection::vec(record(), 0..60),
        fraction in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let pipeline = Pipeline::new(job(usize::MAX));
        let table = pipeline.aggregate_shard(source(&records)).unwrap().table;
        let list = rank(&table, &pipeline.job().order, usize::MAX).unwrap();

        let a = sample(&list, fraction, seed).unwrap();
        let b = sample(&list, fraction, seed).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert!(a.len() <= list.len());
    }
}
