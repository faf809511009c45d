//! Random bit source for hypervector generation
//!
//! Wraps a cryptographically strong `StdRng`. A source is either seeded from
//! OS entropy (normal runs) or from a fixed `u64` (reproducible runs and tests).
//! The source is passed explicitly to every call site that needs randomness;
//! there is no process-wide generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Explicit handle to the pseudorandom stream used for basis vectors and
/// bundling tie-breakers.
#[derive(Debug, Clone)]
pub struct RandomVectorSource {
    rng: StdRng,
}

impl RandomVectorSource {
    /// Seed from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::RandomVectorSource;
    ///
    /// let mut a = RandomVectorSource::seeded(7);
    /// let mut b = RandomVectorSource::seeded(7);
    /// assert_eq!(a.random_words(100), b.random_words(100));
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is set, entropy-backed otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    /// Split off an independent child stream.
    ///
    /// The child is fully determined by the parent's state at the time of the
    /// call, so handing one child to each document keeps parallel encoding
    /// reproducible under a fixed seed.
    pub fn derive(&mut self) -> Self {
        Self::seeded(self.rng.gen())
    }

    /// `dim` independent uniform bits packed little-endian into `u64` words.
    ///
    /// Bits past `dim` in the last word are always zero.
    pub fn random_words(&mut self, dim: usize) -> Vec<u64> {
        let words = (dim + 63) / 64;
        let mut out: Vec<u64> = (0..words).map(|_| self.rng.gen::<u64>()).collect();
        let tail = dim % 64;
        if tail != 0 {
            if let Some(last) = out.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_words_masks_tail() {
        let mut src = RandomVectorSource::seeded(1);
        for dim in [1usize, 63, 64, 65, 130] {
            let words = src.random_words(dim);
            assert_eq!(words.len(), (dim + 63) / 64);
            let set: u32 = words.iter().map(|w| w.count_ones()).sum();
            assert!(set as usize <= dim);
            if dim % 64 != 0 {
                let last = *words.last().unwrap();
                assert_eq!(last >> (dim % 64), 0);
            }
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let mut a = RandomVectorSource::seeded(99);
        let mut b = RandomVectorSource::seeded(99);
        let mut ca = a.derive();
        let mut cb = b.derive();
        assert_eq!(ca.random_words(256), cb.random_words(256));
        // Parent streams advanced identically.
        assert_eq!(a.random_words(64), b.random_words(64));
    }

    #[test]
    fn test_consecutive_draws_differ() {
        let mut src = RandomVectorSource::seeded(3);
        assert_ne!(src.random_words(1024), src.random_words(1024));
    }
}
