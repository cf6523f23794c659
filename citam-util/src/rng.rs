use std::hash::{Hash, Hasher};

use rand::prelude::*;

use crate::SimRng;

/// Construct a throwaway random number generator seeded by a noise value.
///
/// Good for short-lived sampling in a context that already has a stable key
/// to seed from (e.g. an agent id), without threading the main simulation
/// RNG through.
pub fn srng(seed: &(impl Hash + ?Sized)) -> SimRng {
    // NB. This hash function used here must work the same on all platforms.
    // Do not use the fx hasher, its output isn't specified to be stable.
    let mut h = twox_hash::XxHash64::default();
    seed.hash(&mut h);
    SimRng::seed_from_u64(h.finish())
}

pub trait RngExt {
    fn one_chance_in(&mut self, n: usize) -> bool;
}

impl<T: Rng + ?Sized> RngExt for T {
    fn one_chance_in(&mut self, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        self.random_range(0..n) == 0
    }
}
