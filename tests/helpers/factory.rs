pub use super::factories::{RawRecordFactory, ScanRowFactory, StateTableFactory};

pub struct Factory;

impl Factory {
    pub fn raw_record() -> RawRecordFactory {
        RawRecordFactory::new()
    }

    pub fn scan_row(row_key: &str) -> ScanRowFactory {
        ScanRowFactory::new(row_key)
    }

    pub fn state_table() -> StateTableFactory {
        StateTableFactory::new()
    }
}
