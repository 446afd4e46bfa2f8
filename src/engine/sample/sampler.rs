use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::Deserialize;
use tracing::debug;

use crate::engine::errors::SampleError;
use crate::engine::rank::ResultList;

/// Fraction and seed for a reproducible draw.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SampleSpec {
    pub fraction: f64,
    pub seed: u64,
}

impl SampleSpec {
    pub fn validate(&self) -> Result<(), SampleError> {
        check_fraction(self.fraction)
    }
}

fn check_fraction(fraction: f64) -> Result<(), SampleError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(SampleError::InvalidFraction(fraction))
    }
}

/// Number of entries drawn for `len` entries at `fraction`, rounding half to even.
pub fn sample_size(len: usize, fraction: f64) -> usize {
    (len as f64 * fraction).round_ties_even() as usize
}

/// Draws `round(len * fraction)` distinct entries uniformly at random.
///
/// The generator is seeded from `seed`, so the same list, fraction and seed
/// always produce the same sample in the same order.
pub fn sample(list: &ResultList, fraction: f64, seed: u64) -> Result<ResultList, SampleError> {
    check_fraction(fraction)?;

    let amount = sample_size(list.len(), fraction);
    let mut rng = StdRng::seed_from_u64(seed);
    let picked = index::sample(&mut rng, list.len(), amount);

    debug!(
        target: "retail_rank::sample",
        from = list.len(),
        drawn = amount,
        fraction,
        seed,
        "Sampled ranked list"
    );

    let entries = list.entries();
    Ok(ResultList::new(
        picked.into_iter().map(|i| entries[i].clone()).collect(),
    ))
}
