use crate::engine::types::GroupKey;
use crate::test_helpers::factory::Factory;

#[test]
fn merges_orders_under_their_code() {
    let table = Factory::state_table()
        .with_order("LAVAL", "2", "1", "A1")
        .with_order("LAVAL", "3", "1", "A1")
        .create();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&GroupKey::single("A1")).map(|s| s.count), Some(2));
}
