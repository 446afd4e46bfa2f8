use crate::engine::errors::RecordError;
use crate::engine::filter::{Predicate, year_of};

#[test]
fn in_set_is_exact_equality() {
    let p = Predicate::in_set(["22", "49"]);
    assert!(p.evaluate("dep", Some("22")).unwrap());
    assert!(!p.evaluate("dep", Some("220")).unwrap());
    assert!(!p.evaluate("dep", None).unwrap());
}

#[test]
fn prefix_in_set_checks_department_prefix() {
    let p = Predicate::prefix_in_set(2, ["53", "61", "28"]);
    assert!(p.evaluate("cpcli", Some("53000")).unwrap());
    assert!(p.evaluate("cpcli", Some("61100")).unwrap());
    assert!(!p.evaluate("cpcli", Some("75001")).unwrap());
    assert!(!p.evaluate("cpcli", Some("5")).unwrap());
    assert!(!p.evaluate("cpcli", Some("")).unwrap());
}

#[test]
fn year_range_is_inclusive() {
    let p = Predicate::year_range(2006, 2010);
    assert!(p.evaluate("datcde", Some("2006-01-01")).unwrap());
    assert!(p.evaluate("datcde", Some("2010-12-31")).unwrap());
    assert!(p.evaluate("datcde", Some("2010-12-31 00:00:00")).unwrap());
    assert!(!p.evaluate("datcde", Some("2005-12-31")).unwrap());
    assert!(!p.evaluate("datcde", Some("2011-01-01")).unwrap());
}

#[test]
fn year_range_reports_unparsable_dates() {
    let p = Predicate::year_range(2006, 2010);
    let err = p.evaluate("datcde", Some("14/05/2008")).unwrap_err();
    assert_eq!(
        err,
        RecordError::malformed("datcde", "14/05/2008", "expected a YYYY-MM-DD date")
    );
    assert!(year_of("datcde", "").is_err());
}

#[test]
fn numeric_range_handles_open_bounds() {
    let p = Predicate::NumericRange {
        min: Some(1.0),
        max: None,
    };
    assert!(p.evaluate("qte", Some("1")).unwrap());
    assert!(p.evaluate("qte", Some("1000")).unwrap());
    assert!(!p.evaluate("qte", Some("0.5")).unwrap());
    assert!(p.evaluate("qte", Some("x")).is_err());
}

#[test]
fn missing_or_zero_accepts_absent_empty_and_zero() {
    let p = Predicate::MissingOrZero;
    assert!(p.evaluate("timbrecli", None).unwrap());
    assert!(p.evaluate("timbrecli", Some("")).unwrap());
    assert!(p.evaluate("timbrecli", Some("0")).unwrap());
    assert!(p.evaluate("timbrecli", Some("0.0")).unwrap());
    assert!(!p.evaluate("timbrecli", Some("1.2")).unwrap());
    assert!(matches!(
        p.evaluate("timbrecli", Some("n/a")),
        Err(RecordError::Malformed { .. })
    ));
}

#[test]
fn contains_can_ignore_case() {
    let city = Predicate::contains("NANTES", true);
    assert!(city.evaluate("villecli", Some("Nantes Cedex")).unwrap());
    assert!(!city.evaluate("villecli", Some("Angers")).unwrap());

    let year = Predicate::contains("2020", false);
    assert!(year.evaluate("datcde", Some("2020-03-01")).unwrap());
    assert!(!year.evaluate("datcde", Some("2019-03-01")).unwrap());
}
