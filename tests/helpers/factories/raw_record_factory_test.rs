use crate::test_helpers::factory::Factory;

#[test]
fn builds_order_rows_with_overrides() {
    let record = Factory::raw_record()
        .with("villecli", "ANGERS")
        .without("timbrecli")
        .create();
    assert_eq!(record.get("villecli"), Some("ANGERS"));
    assert_eq!(record.get("codcde"), Some("A1"));
    assert!(!record.contains("timbrecli"));
}
