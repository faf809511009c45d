//! Symbol basis: one random hypervector per character code 1..=127.

use crate::cache::{CacheKey, VectorCache};
use crate::error::{LangHdError, Result};
use crate::hypervector::HyperVector;
use crate::rng::RandomVectorSource;
use tracing::{debug, info};

/// Lowest character code with a basis vector.
pub const FIRST_CODE: u8 = 1;
/// Highest character code with a basis vector.
pub const LAST_CODE: u8 = 127;

/// Immutable mapping from character code to its basis vector.
#[derive(Debug, Clone)]
pub struct SymbolBasis {
    dim: usize,
    /// Index `code - 1`.
    vectors: Vec<HyperVector>,
}

impl SymbolBasis {
    /// Build the basis, reusing cached vectors where present.
    ///
    /// Codes missing from `cache` get a fresh random vector, which is written
    /// back so later runs map the same code to the same vector. Without a cache
    /// every code is freshly generated.
    pub fn build(
        dim: usize,
        source: &mut RandomVectorSource,
        cache: Option<&dyn VectorCache>,
    ) -> Result<Self> {
        if dim == 0 {
            return Err(LangHdError::InvalidDimension(dim));
        }

        let mut vectors = Vec::with_capacity(usize::from(LAST_CODE));
        let mut loaded = 0usize;
        for code in FIRST_CODE..=LAST_CODE {
            let key = CacheKey::Character(code);
            let cached = match cache {
                Some(c) => c.load_vector(&key, dim)?,
                None => None,
            };
            let vector = match cached {
                Some(v) => {
                    loaded += 1;
                    v
                }
                None => {
                    let v = HyperVector::random(dim, source);
                    if let Some(c) = cache {
                        c.store_vector(&key, &v)?;
                        debug!(code, "cached new basis vector");
                    }
                    v
                }
            };
            vectors.push(vector);
        }

        info!(
            dim,
            loaded,
            generated = vectors.len() - loaded,
            "symbol basis ready"
        );
        Ok(Self { dim, vectors })
    }

    /// Basis vector for `code`, or `None` outside 1..=127.
    pub fn get(&self, code: u8) -> Option<&HyperVector> {
        if !(FIRST_CODE..=LAST_CODE).contains(&code) {
            return None;
        }
        self.vectors.get(usize::from(code - FIRST_CODE))
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
