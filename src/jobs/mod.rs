mod catalog;

pub use catalog::{Chart, JobDefinition, JobKind, build};

#[cfg(test)]
mod catalog_test;
