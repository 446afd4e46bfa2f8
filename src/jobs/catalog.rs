use std::fmt;

use clap::ValueEnum;

use crate::engine::aggregate::{AggregatePlan, year_key};
use crate::engine::export::{Column, Schema};
use crate::engine::filter::{FilterSpec, Predicate};
use crate::engine::pipeline::JobSpec;
use crate::engine::rank::{OrderSpec, SortField};
use crate::engine::types::{GroupKey, MONEY_SCALE};
use crate::shared::config::{InputConfig, JobsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum JobKind {
    /// Top orders by quantity then stamp, for a department set and year range.
    TopOrders,
    /// A seeded sample of the top orders without client stamp.
    SampledOrders,
    /// The single best order of a city in a given year.
    BestCityOrder,
    /// Number of orders per year, every year of the range reported.
    OrdersByYear,
    /// The client with the largest ordered quantity.
    TopClient,
}

impl JobKind {
    pub const ALL: [JobKind; 5] = [
        JobKind::TopOrders,
        JobKind::SampledOrders,
        JobKind::BestCityOrder,
        JobKind::OrdersByYear,
        JobKind::TopClient,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobKind::TopOrders => "top-orders",
            JobKind::SampledOrders => "sampled-orders",
            JobKind::BestCityOrder => "best-city-order",
            JobKind::OrdersByYear => "orders-by-year",
            JobKind::TopClient => "top-client",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chart-ready series a job writes next to its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chart {
    /// Total of `sum` per `descriptive` value (pie chart).
    TotalBy { descriptive: String, sum: String },
    /// Entry count per key (bar chart).
    CountByKey { label: String },
}

/// Everything needed to run one job and write its outputs.
#[derive(Debug, Clone)]
pub struct JobDefinition {
    pub kind: JobKind,
    pub spec: JobSpec,
    pub schema: Schema,
    pub chart: Option<Chart>,
    pub input: InputConfig,
}

pub fn build(kind: JobKind, jobs: &JobsConfig) -> JobDefinition {
    match kind {
        JobKind::TopOrders => top_orders(jobs),
        JobKind::SampledOrders => sampled_orders(jobs),
        JobKind::BestCityOrder => best_city_order(jobs),
        JobKind::OrdersByYear => orders_by_year(jobs),
        JobKind::TopClient => top_client(jobs),
    }
}

fn order_columns() -> Schema {
    Schema::new()
        .column("codcde", Column::Key(0))
        .with(Column::Descriptive("villecli".into()))
        .with(Column::Sum("qte".into()))
        .with(Column::Sum("timbrecde".into()))
}

fn top_orders(jobs: &JobsConfig) -> JobDefinition {
    let cfg = &jobs.top_orders;
    let filter = FilterSpec::new()
        .require(["codcli", "cpcli", "villecli", "codcde", "timbrecde", "qte", "datcde"])
        .with("datcde", Predicate::year_range(cfg.year_min, cfg.year_max))
        .with("cpcli", Predicate::prefix_in_set(2, cfg.departments.iter().cloned()));
    let plan = AggregatePlan::keyed_by("codcde")
        .sum("qte", 0)
        .sum("timbrecde", MONEY_SCALE)
        .describe(["villecli"]);
    let spec = JobSpec::new(JobKind::TopOrders.name(), filter, plan)
        .order_by(
            OrderSpec::new()
                .desc(SortField::Sum("qte".into()))
                .desc(SortField::Sum("timbrecde".into())),
        )
        .bounded(cfg.bound);

    JobDefinition {
        kind: JobKind::TopOrders,
        spec,
        schema: order_columns(),
        chart: None,
        input: cfg.input.clone(),
    }
}

fn sampled_orders(jobs: &JobsConfig) -> JobDefinition {
    let cfg = &jobs.sampled_orders;
    let filter = FilterSpec::new()
        .require(["codcli", "cpcli", "villecli", "codcde", "timbrecli", "qte", "datcde"])
        .integer("qte")
        .with("datcde", Predicate::year_range(cfg.year_min, cfg.year_max))
        .with("cpcli", Predicate::prefix_in_set(2, cfg.departments.iter().cloned()))
        .with("timbrecli", Predicate::MissingOrZero);
    let plan = AggregatePlan::keyed_by("codcde")
        .sum("qte", 0)
        .describe(["villecli"]);
    let spec = JobSpec::new(JobKind::SampledOrders.name(), filter, plan)
        .order_by(
            OrderSpec::new()
                .desc(SortField::Sum("qte".into()))
                .desc(SortField::Mean("qte".into())),
        )
        .bounded(cfg.bound)
        .sampled(cfg.fraction, cfg.seed);

    JobDefinition {
        kind: JobKind::SampledOrders,
        spec,
        schema: Schema::new()
            .column("codcde", Column::Key(0))
            .with(Column::Descriptive("villecli".into()))
            .column("total_qte", Column::Sum("qte".into()))
            .with(Column::Mean("qte".into())),
        chart: Some(Chart::TotalBy {
            descriptive: "villecli".into(),
            sum: "qte".into(),
        }),
        input: cfg.input.clone(),
    }
}

fn best_city_order(jobs: &JobsConfig) -> JobDefinition {
    let cfg = &jobs.best_city_order;
    let filter = FilterSpec::new()
        .with("datcde", Predicate::contains(cfg.year.as_str(), false))
        .with("villecli", Predicate::contains(cfg.city.as_str(), true));
    let plan = AggregatePlan::keyed_by("codcde")
        .sum_or_zero("qte", 0)
        .sum_or_zero("timbrecde", MONEY_SCALE)
        .describe(["villecli", "datcde", "genrecli", "nomcli", "prenomcli"]);
    let spec = JobSpec::new(JobKind::BestCityOrder.name(), filter, plan)
        .order_by(
            OrderSpec::new()
                .desc(SortField::Sum("qte".into()))
                .desc(SortField::Sum("timbrecde".into())),
        )
        .bounded(cfg.bound);

    JobDefinition {
        kind: JobKind::BestCityOrder,
        spec,
        schema: Schema::new()
            .with(Column::Descriptive("villecli".into()))
            .with(Column::Descriptive("datcde".into()))
            .column("codcde", Column::Key(0))
            .with(Column::Sum("qte".into()))
            .with(Column::Sum("timbrecde".into()))
            .with(Column::Descriptive("genrecli".into()))
            .with(Column::Descriptive("nomcli".into()))
            .with(Column::Descriptive("prenomcli".into())),
        chart: None,
        input: cfg.input.clone(),
    }
}

fn orders_by_year(jobs: &JobsConfig) -> JobDefinition {
    let cfg = &jobs.orders_by_year;
    let filter = FilterSpec::new()
        .require(["datcde"])
        .with("datcde", Predicate::year_range(cfg.year_min, cfg.year_max));
    let plan = AggregatePlan::keyed_by_year_of("datcde");
    let spec = JobSpec::new(JobKind::OrdersByYear.name(), filter, plan)
        .order_by(OrderSpec::new().asc(SortField::Key))
        .seed_keys((cfg.year_min..=cfg.year_max).map(|y| GroupKey::single(year_key(y))));

    JobDefinition {
        kind: JobKind::OrdersByYear,
        spec,
        schema: Schema::new()
            .column("year", Column::Key(0))
            .column("orders", Column::Count),
        chart: Some(Chart::CountByKey {
            label: "year".into(),
        }),
        input: cfg.input.clone(),
    }
}

fn top_client(jobs: &JobsConfig) -> JobDefinition {
    let cfg = &jobs.top_client;
    let filter = FilterSpec::new().require(["codcli", "qte", "nomcli", "prenomcli"]);
    let plan = AggregatePlan::keyed_by("codcli")
        .sum("qte", 0)
        .sum_or_zero("timbrecli", MONEY_SCALE)
        .describe(["nomcli", "prenomcli"]);
    let spec = JobSpec::new(JobKind::TopClient.name(), filter, plan)
        .order_by(OrderSpec::new().desc(SortField::Sum("qte".into())))
        .bounded(cfg.bound);

    JobDefinition {
        kind: JobKind::TopClient,
        spec,
        schema: Schema::new()
            .column("codcli", Column::Key(0))
            .with(Column::Count)
            .column("total_qty", Column::Sum("qte".into()))
            .column("total_timbre", Column::Sum("timbrecli".into()))
            .with(Column::Descriptive("nomcli".into()))
            .with(Column::Descriptive("prenomcli".into())),
        chart: None,
        input: cfg.input.clone(),
    }
}
