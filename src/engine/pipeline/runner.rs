use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::job::JobSpec;
use super::summary::{RunReport, RunSummary};
use crate::engine::aggregate::StateTable;
use crate::engine::errors::{PipelineError, RecordError, SourceError};
use crate::engine::export::Exporter;
use crate::engine::filter::{FilterStats, RecordFilter};
use crate::engine::rank::rank;
use crate::engine::sample::sample;
use crate::engine::source::RecordSource;

/// Partial aggregate of one shard with the counters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardOutput {
    pub table: StateTable,
    pub stats: FilterStats,
}

/// Runs a [`JobSpec`]: filter, aggregate per shard, merge, rank, sample, export.
#[derive(Debug, Clone)]
pub struct Pipeline {
    job: JobSpec,
}

impl Pipeline {
    /// Fields the plan reads are added to the filter's extraction list.
    pub fn new(mut job: JobSpec) -> Self {
        let missing: Vec<String> = job
            .plan
            .fields()
            .into_iter()
            .filter(|f| !job.filter.extract.iter().any(|e| e == f))
            .map(str::to_string)
            .collect();
        job.filter.extract.extend(missing);
        Self { job }
    }

    pub fn job(&self) -> &JobSpec {
        &self.job
    }

    fn empty_shard(&self) -> ShardOutput {
        ShardOutput {
            table: StateTable::new(self.job.plan.clone()),
            stats: FilterStats::default(),
        }
    }

    /// One sequential pass over `source`. Bad records are logged, counted and
    /// skipped; a fatal source error aborts the shard. An invalid job fails
    /// before the first record is read.
    pub fn aggregate_shard<S: RecordSource>(&self, source: S) -> Result<ShardOutput, PipelineError> {
        self.job.validate()?;
        let mut filter = RecordFilter::new(self.job.filter.clone());
        let mut table = StateTable::new(self.job.plan.clone());
        let mut unmerged = FilterStats::default();

        for item in source {
            let record = match item {
                Ok(record) => record,
                Err(SourceError::Record(err)) => {
                    warn!(target: "retail_rank::pipeline", job = %self.job.name, error = %err, "Unreadable record");
                    filter.note_unreadable();
                    continue;
                }
                Err(err) => return Err(PipelineError::Source(err)),
            };

            let Ok(Some(projection)) = filter.apply(&record) else {
                continue;
            };

            if let Err(err) = table.merge_projection(&projection) {
                warn!(target: "retail_rank::pipeline", job = %self.job.name, error = %err, "Record not aggregated");
                unmerged.accepted += 1;
                match err {
                    RecordError::MissingField { .. } => unmerged.rejected += 1,
                    RecordError::Malformed { .. } => unmerged.malformed += 1,
                }
            }
        }

        let mut stats = filter.stats();
        stats.accepted -= unmerged.accepted;
        stats.rejected += unmerged.rejected;
        stats.malformed += unmerged.malformed;

        debug!(
            target: "retail_rank::pipeline",
            job = %self.job.name,
            seen = stats.seen,
            accepted = stats.accepted,
            keys = table.len(),
            "Shard aggregated"
        );
        Ok(ShardOutput { table, stats })
    }

    /// Folds shard outputs together in the order given.
    pub fn merge_shards(&self, shards: Vec<ShardOutput>) -> Result<ShardOutput, PipelineError> {
        let mut merged = self.empty_shard();
        for shard in shards {
            merged.table.merge_partial(shard.table)?;
            merged.stats.absorb(&shard.stats);
        }
        Ok(merged)
    }

    /// Seeds keys, ranks, and samples the merged aggregate.
    pub fn finalize(&self, merged: ShardOutput) -> Result<RunReport, PipelineError> {
        self.job.validate()?;
        let ShardOutput { mut table, stats } = merged;
        let keys_aggregated = table.len();
        for key in &self.job.seed_keys {
            table.ensure_key(key.clone());
        }

        let ranked = rank(&table, &self.job.order, self.job.bound)?;
        let results = match self.job.sample {
            Some(spec) => sample(&ranked, spec.fraction, spec.seed)?,
            None => ranked,
        };

        let summary = RunSummary::from_stats(&stats, keys_aggregated, results.len());
        info!(
            target: "retail_rank::pipeline",
            job = %self.job.name,
            %summary,
            "Run finalized"
        );
        Ok(RunReport {
            job: self.job.name.clone(),
            summary,
            results,
        })
    }

    pub fn run<S, E>(&self, source: S, exporter: &mut E) -> Result<RunReport, PipelineError>
    where
        S: RecordSource,
        E: Exporter + ?Sized,
    {
        let shard = self.aggregate_shard(source)?;
        let merged = self.merge_shards(vec![shard])?;
        self.export(self.finalize(merged)?, exporter)
    }

    /// Aggregates each source on the rayon pool, then merges sequentially in
    /// source order.
    pub fn run_sharded<S, E>(&self, sources: Vec<S>, exporter: &mut E) -> Result<RunReport, PipelineError>
    where
        S: RecordSource + Send,
        E: Exporter + ?Sized,
    {
        self.job.validate()?;
        info!(
            target: "retail_rank::pipeline",
            job = %self.job.name,
            shards = sources.len(),
            "Aggregating shards"
        );
        let shards = sources
            .into_par_iter()
            .map(|source| self.aggregate_shard(source))
            .collect::<Result<Vec<_>, _>>()?;
        let merged = self.merge_shards(shards)?;
        self.export(self.finalize(merged)?, exporter)
    }

    fn export<E: Exporter + ?Sized>(
        &self,
        report: RunReport,
        exporter: &mut E,
    ) -> Result<RunReport, PipelineError> {
        match exporter.export(&report.results) {
            Ok(()) => Ok(report),
            Err(error) => Err(PipelineError::Export {
                error,
                report: Box::new(report),
            }),
        }
    }
}
