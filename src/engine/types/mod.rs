mod amount;
mod group_key;
mod raw_record;

pub use amount::{Amount, MONEY_SCALE};
pub use group_key::GroupKey;
pub use raw_record::{Projection, RawRecord};

#[cfg(test)]
mod group_key_test;
