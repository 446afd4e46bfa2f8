pub mod raw_record_factory;
pub mod scan_row_factory;
pub mod state_table_factory;

pub use raw_record_factory::RawRecordFactory;
pub use scan_row_factory::ScanRowFactory;
pub use state_table_factory::StateTableFactory;

#[cfg(test)]
mod raw_record_factory_test;
#[cfg(test)]
mod scan_row_factory_test;
#[cfg(test)]
mod state_table_factory_test;
