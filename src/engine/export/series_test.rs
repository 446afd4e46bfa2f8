use crate::engine::aggregate::AggregatePlan;
use crate::engine::export::{count_by_key, total_by, write_series_csv};
use crate::engine::rank::{OrderSpec, SortField, rank};
use crate::test_helpers::factories::{RawRecordFactory, StateTableFactory};

#[test]
fn totals_are_grouped_by_descriptive_field_in_first_seen_order() {
    let table = StateTableFactory::new()
        .with_order("LAVAL", "10", "0", "A1")
        .with_order("NANTES", "7", "0", "A2")
        .with_order("LAVAL", "3", "0", "A3")
        .create();
    let list = rank(&table, &OrderSpec::new().desc(SortField::Sum("qte".into())), 10).unwrap();

    let series = total_by(&list, "villecli", "qte").unwrap();
    assert_eq!(series.label, "villecli");
    assert_eq!(series.value, "total_qte");
    assert_eq!(
        series.points,
        vec![
            ("LAVAL".to_string(), "13".to_string()),
            ("NANTES".to_string(), "7".to_string()),
        ]
    );
}

#[test]
fn counts_follow_list_order() {
    let table = StateTableFactory::new()
        .with_plan(AggregatePlan::keyed_by_year_of("datcde"))
        .with_record(RawRecordFactory::new().with("datcde", "2012-01-03").create())
        .with_record(RawRecordFactory::new().with("datcde", "2011-06-30").create())
        .with_record(RawRecordFactory::new().with("datcde", "2012-11-11").create())
        .create();
    let list = rank(&table, &OrderSpec::new().asc(SortField::Key), usize::MAX).unwrap();

    let series = count_by_key(&list, "year");
    assert_eq!(
        series.points,
        vec![
            ("2011".to_string(), "1".to_string()),
            ("2012".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn series_csv_has_a_header_row() {
    let table = StateTableFactory::new()
        .with_order("LAVAL", "2", "0", "A1")
        .create();
    let list = rank(&table, &OrderSpec::new(), 10).unwrap();
    let mut out = Vec::new();
    write_series_csv(&mut out, &total_by(&list, "villecli", "qte").unwrap()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "villecli,total_qte\nLAVAL,2\n");
}
