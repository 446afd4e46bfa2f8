mod sampler;

pub use sampler::{SampleSpec, sample, sample_size};
