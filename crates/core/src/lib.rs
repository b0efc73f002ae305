#![warn(missing_docs)]
//! Core primitives shared across the workspace.

use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Resolve a configured world seed: `0` means "draw a random nonzero seed".
///
/// All generation derives from the returned value, so resolving once at
/// startup is the only place OS entropy is allowed to enter the system.
pub fn resolve_seed(configured: u64) -> u64 {
    if configured != 0 {
        return configured;
    }
    let mut rng = rand::thread_rng();
    loop {
        let seed = rng.next_u64();
        if seed != 0 {
            return seed;
        }
    }
}

/// Derive a reproducible RNG scoped to a single chunk.
///
/// The chunk coordinate is mixed into the world seed with the usual spatial
/// hash primes, so a chunk's random content does not depend on the order in
/// which chunks are generated.
pub fn chunk_rng(world_seed: u64, chunk_x: i32, chunk_z: i32) -> StdRng {
    let chunk_hash = (chunk_x as u64)
        .wrapping_mul(73_856_093)
        .wrapping_add((chunk_z as u64).wrapping_mul(19_349_663));
    let seed = world_seed.wrapping_add(chunk_hash).wrapping_add(0xDEAD_BEEF);
    StdRng::seed_from_u64(seed)
}
