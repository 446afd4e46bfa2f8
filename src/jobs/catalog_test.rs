use crate::engine::errors::SourceError;
use crate::engine::export::{MemoryExporter, render_rows};
use crate::engine::pipeline::{Pipeline, RunReport};
use crate::engine::types::RawRecord;
use crate::jobs::{Chart, JobKind, build};
use crate::shared::config::JobsConfig;
use crate::test_helpers::factories::RawRecordFactory;

fn run(kind: JobKind, jobs: &JobsConfig, records: Vec<RawRecord>) -> RunReport {
    let definition = build(kind, jobs);
    let source = records
        .into_iter()
        .map(Ok::<_, SourceError>)
        .collect::<Vec<_>>()
        .into_iter();
    Pipeline::new(definition.spec)
        .run(source, &mut MemoryExporter::new())
        .unwrap()
}

fn order(cp: &str, date: &str, codcde: &str, qte: &str, timbre: &str) -> RawRecord {
    RawRecordFactory::new()
        .with("cpcli", cp)
        .with("datcde", date)
        .with("codcde", codcde)
        .with("qte", qte)
        .with("timbrecde", timbre)
        .create()
}

fn city_order(city: &str, date: &str, codcde: &str, qte: &str, timbre: &str) -> RawRecord {
    RawRecordFactory::new()
        .with("villecli", city)
        .with("datcde", date)
        .with("codcde", codcde)
        .with("qte", qte)
        .with("timbrecde", timbre)
        .create()
}

#[test]
fn every_job_has_a_distinct_name() {
    let names: std::collections::BTreeSet<_> = JobKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(names.len(), JobKind::ALL.len());
    assert_eq!(JobKind::SampledOrders.to_string(), "sampled-orders");
}

#[test]
fn top_orders_keeps_departments_and_years_then_ranks() {
    let report = run(
        JobKind::TopOrders,
        &JobsConfig::default(),
        vec![
            order("53000", "2008-01-01", "A1", "4", "1.0"),
            order("61100", "2010-12-31", "A2", "4", "2.5"),
            order("28000", "2006-03-03", "A3", "9", "0"),
            order("44000", "2008-01-01", "X1", "50", "0"),
            order("53000", "2011-01-01", "X2", "50", "0"),
        ],
    );
    let keys: Vec<_> = report.results.iter().map(|e| e.key.to_string()).collect();
    assert_eq!(keys, vec!["A3", "A2", "A1"]);
    assert_eq!(report.summary.rejected, 2);
}

#[test]
fn configured_departments_replace_the_defaults() {
    let mut jobs = JobsConfig::default();
    jobs.top_orders.departments = vec!["44".into()];
    jobs.top_orders.bound = 1;
    let report = run(
        JobKind::TopOrders,
        &jobs,
        vec![
            order("44000", "2008-01-01", "X1", "50", "0"),
            order("53000", "2008-01-01", "A1", "60", "0"),
        ],
    );
    assert_eq!(report.results.keys().len(), 1);
    assert_eq!(report.results.entries()[0].key.to_string(), "X1");
}

#[test]
fn fractional_and_exponent_quantities_are_malformed() {
    let report = run(
        JobKind::TopOrders,
        &JobsConfig::default(),
        vec![
            order("53000", "2008-01-01", "A1", "2.6", "1.0"),
            order("53000", "2008-01-01", "A1", "1e1", "1.0"),
            order("53000", "2008-01-01", "A1", "4", "1.0"),
        ],
    );
    assert_eq!(report.summary.malformed, 2);
    assert_eq!(report.summary.accepted, 1);
    let a1 = &report.results.entries()[0];
    assert_eq!(a1.sum("qte").map(|q| q.to_string()), Some("4".to_string()));
}

#[test]
fn sampled_orders_requires_whole_quantities() {
    let mut jobs = JobsConfig::default();
    jobs.sampled_orders.fraction = 1.0;
    let report = run(
        JobKind::SampledOrders,
        &jobs,
        vec![
            order("22000", "2012-01-01", "A1", "2.4", "0"),
            order("22000", "2012-01-01", "A2", "3", "0"),
        ],
    );
    assert_eq!(report.summary.malformed, 1);
    assert_eq!(report.summary.accepted, 1);
    assert_eq!(report.results.len(), 1);
}

#[test]
fn sampled_orders_only_keeps_orders_without_client_stamp() {
    let mut jobs = JobsConfig::default();
    jobs.sampled_orders.fraction = 1.0;
    let report = run(
        JobKind::SampledOrders,
        &jobs,
        vec![
            order("22000", "2012-01-01", "A1", "3", "0"),
            RawRecordFactory::new()
                .with("cpcli", "49000")
                .with("datcde", "2013-01-01")
                .with("codcde", "A2")
                .with("timbrecli", "")
                .create(),
            RawRecordFactory::new()
                .with("cpcli", "49000")
                .with("datcde", "2013-01-01")
                .with("codcde", "X1")
                .with("timbrecli", "1.5")
                .create(),
        ],
    );
    let mut keys: Vec<_> = report.results.iter().map(|e| e.key.to_string()).collect();
    keys.sort();
    assert_eq!(keys, vec!["A1", "A2"]);
    assert!(matches!(
        build(JobKind::SampledOrders, &jobs).chart,
        Some(Chart::TotalBy { .. })
    ));
}

#[test]
fn best_city_order_matches_city_case_insensitively() {
    let report = run(
        JobKind::BestCityOrder,
        &JobsConfig::default(),
        vec![
            city_order("Nantes", "2020-04-02", "A1", "5", "1"),
            city_order("NANTES", "2020-05-02", "A2", "5", "2"),
            city_order("NANTES", "2019-05-02", "X1", "99", "0"),
        ],
    );
    assert_eq!(report.results.len(), 1);
    let best = &report.results.entries()[0];
    assert_eq!(best.key.to_string(), "A2");
    assert_eq!(best.descriptive("datcde"), Some("2020-05-02"));
}

#[test]
fn orders_by_year_reports_every_year_of_the_range() {
    let definition = build(JobKind::OrdersByYear, &JobsConfig::default());
    let report = run(
        JobKind::OrdersByYear,
        &JobsConfig::default(),
        vec![
            RawRecordFactory::new().with("datcde", "2012-01-01").create(),
            RawRecordFactory::new().with("datcde", "2012-06-01").create(),
            RawRecordFactory::new().with("datcde", "2020-06-01").create(),
        ],
    );
    let rows = render_rows(&definition.schema, &report.results);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0], vec!["2010", "0"]);
    assert_eq!(rows[2], vec!["2012", "2"]);
    assert_eq!(rows[5], vec!["2015", "0"]);
}

#[test]
fn orders_by_year_sorts_years_of_different_widths() {
    let mut jobs = JobsConfig::default();
    jobs.orders_by_year.year_min = 998;
    jobs.orders_by_year.year_max = 1001;
    let definition = build(JobKind::OrdersByYear, &jobs);
    let report = run(
        JobKind::OrdersByYear,
        &jobs,
        vec![
            RawRecordFactory::new().with("datcde", "999-03-01").create(),
            RawRecordFactory::new().with("datcde", "1001-03-01").create(),
        ],
    );
    let rows = render_rows(&definition.schema, &report.results);
    let years: Vec<_> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(years, vec!["0998", "0999", "1000", "1001"]);
    assert_eq!(rows[1], vec!["0999", "1"]);
}

#[test]
fn top_client_sums_quantity_per_client() {
    let report = run(
        JobKind::TopClient,
        &JobsConfig::default(),
        vec![
            RawRecordFactory::new().with("codcli", "7").with("qte", "2").create(),
            RawRecordFactory::new().with("codcli", "7").with("qte", "5").create(),
            RawRecordFactory::new().with("codcli", "8").with("qte", "6").create(),
        ],
    );
    let top = &report.results.entries()[0];
    assert_eq!(top.key.to_string(), "7");
    assert_eq!(top.count, 2);
    assert_eq!(top.sum("qte").map(|q| q.to_string()), Some("7".to_string()));
    assert_eq!(top.descriptive("nomcli"), Some("DUPONT"));
}

#[test]
fn top_client_counts_orders_with_an_empty_client_stamp() {
    let definition = build(JobKind::TopClient, &JobsConfig::default());
    let report = run(
        JobKind::TopClient,
        &JobsConfig::default(),
        vec![
            RawRecordFactory::new()
                .with("codcli", "7")
                .with("qte", "2")
                .with("timbrecli", "")
                .create(),
            RawRecordFactory::new()
                .with("codcli", "7")
                .with("qte", "5")
                .with("timbrecli", "1.5")
                .create(),
        ],
    );
    assert_eq!(report.summary.accepted, 2);
    let rows = render_rows(&definition.schema, &report.results);
    assert_eq!(rows[0], vec!["7", "2", "7", "1.5", "DUPONT", "JEAN"]);
}
