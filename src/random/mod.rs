//! Random number generation for the simulation.
//!
//! The engine never reaches for a global generator. It owns whatever `Rng` it was constructed
//! with, so tests can hand it a seeded or stubbed source and assert exact outcomes. For normal
//! runs, `seeded_rng` derives a generator from a base seed and a name, so that independent
//! consumers of randomness seeded from the same base seed still get independent streams.
mod sampling_algorithms;

pub use sampling_algorithms::{sample_distinct, sample_spread_count};

use log::trace;

use crate::hashing::hash_str;
use crate::rand::rngs::SmallRng;
use crate::rand::SeedableRng;

/// Name of the generator used by the infection engine.
pub const INFECTION_RNG: &str = "InfectionRng";

/// Creates a `SmallRng` seeded from `base_seed` offset by the hash of `name`.
#[must_use]
pub fn seeded_rng(base_seed: u64, name: &str) -> SmallRng {
    let seed_offset = hash_str(name);
    trace!("creating new RNG (seed={}) for {}", base_seed, name);
    SmallRng::seed_from_u64(base_seed.wrapping_add(seed_offset))
}
