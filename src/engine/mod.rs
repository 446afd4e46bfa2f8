pub mod aggregate;
pub mod errors;
pub mod export;
pub mod filter;
pub mod index;
pub mod pipeline;
pub mod rank;
pub mod sample;
pub mod source;
pub mod types;

pub use errors::*;
