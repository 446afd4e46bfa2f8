use crate::engine::types::{GroupKey, RawRecord};

#[test]
fn group_keys_order_lexicographically_by_parts() {
    let a = GroupKey::new(vec!["A1".into(), "x".into()]);
    let b = GroupKey::new(vec!["A1".into(), "y".into()]);
    let c = GroupKey::single("B2");
    assert!(a < b);
    assert!(b < c);
    assert_eq!(c.part(0), Some("B2"));
    assert_eq!(c.part(1), None);
}

#[test]
fn display_joins_parts() {
    let key = GroupKey::new(vec!["NANTES".into(), "2020".into()]);
    assert_eq!(key.to_string(), "NANTES|2020");
}

#[test]
fn raw_record_keeps_source_order() {
    let record = RawRecord::from_pairs([("villecli", "NANTES"), ("qte", "3"), ("codcde", "A1")]);
    let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["villecli", "qte", "codcde"]);
    assert_eq!(record.get("qte"), Some("3"));
    assert!(!record.contains("timbrecde"));
    assert_eq!(record.len(), 3);
}
