//! Random source plumbing.
//!
//! Every probabilistic operation in the crate takes `&mut R where R: Rng`; nothing
//! reaches for `thread_rng()`. A season seeded with [`seeded`] is fully reproducible.

use std::hash::{Hash, Hasher};

use fxhash::FxHasher;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Canonical seeded generator for simulations.
pub type SimRng = ChaCha8Rng;

pub fn seeded(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Derive an independent sub-seed from a master seed and a label.
///
/// FxHasher is used instead of `DefaultHasher` because its output is stable across Rust
/// versions, so a recorded master seed keeps replaying the same league.
pub fn derive_seed(base: u64, label: &str) -> u64 {
    let mut hasher = FxHasher::default();
    base.hash(&mut hasher);
    label.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        let xs: Vec<u32> = (0..8).map(|_| a.gen()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_derive_seed_separates_labels() {
        assert_eq!(derive_seed(7, "LCK"), derive_seed(7, "LCK"));
        assert_ne!(derive_seed(7, "LCK"), derive_seed(7, "LPL"));
        assert_ne!(derive_seed(7, "LCK"), derive_seed(8, "LCK"));
    }
}
