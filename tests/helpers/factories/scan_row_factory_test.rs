use crate::test_helpers::factory::Factory;

#[test]
fn prefixes_qualifiers_with_the_family() {
    let row = Factory::scan_row("7")
        .cell("qte", "2")
        .with_family("meta")
        .cell("source", "csv")
        .create();
    assert_eq!(row.row_key, b"7");
    assert_eq!(row.cells[0].0, b"data_fro:qte");
    assert_eq!(row.cells[1].0, b"meta:source");
}
