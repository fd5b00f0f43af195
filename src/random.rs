//! Seedable random number generation.
//!
//! Every stochastic operator in the crate takes an explicit `&mut R: Rng`;
//! this module only decides how generators are built from seeds.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, falling back to OS entropy.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Derives an independent seed for the `index`-th trial of a multi-trial run.
///
/// Trial 0 keeps the base seed, so a single-trial run with seed `s`
/// reproduces a plain GA run with seed `s`.
pub fn trial_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
