//! Text → hypervector encoding
//!
//! A document is normalized to its lowercase ASCII alphanumerics, cut into
//! overlapping n-grams, and each n-gram becomes the XOR of its characters'
//! basis vectors, rotated by their distance from the end of the window:
//!
//! ```text
//! "abc" (N = 3)  →  ρ²(a) ⊗ ρ¹(b) ⊗ ρ⁰(c)
//! ```
//!
//! All n-gram vectors are then majority-bundled into one document vector.

use crate::basis::SymbolBasis;
use crate::error::{LangHdError, Result};
use crate::hypervector::HyperVector;
use crate::rng::RandomVectorSource;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Policy for an even number of n-gram vectors, where strict-majority
/// bundling turns every exact half/half split into a 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Append one fresh random vector so the vote count is odd.
    #[default]
    RandomVector,
    /// Bundle as-is.
    Plain,
}

/// Lowercased ASCII alphanumerics of `raw`; everything else is dropped.
///
/// # Examples
///
/// ```
/// use langhd::encoder::normalize;
///
/// assert_eq!(normalize("Hello, World! 42"), b"helloworld42".to_vec());
/// assert_eq!(normalize("¿Qué?"), b"qu".to_vec());
/// ```
pub fn normalize(raw: impl AsRef<[u8]>) -> Vec<u8> {
    raw.as_ref()
        .iter()
        .filter(|b| b.is_ascii_alphanumeric())
        .map(|b| b.to_ascii_lowercase())
        .collect()
}

/// Encodes documents against a shared, read-only [`SymbolBasis`].
#[derive(Debug, Clone, Copy)]
pub struct TextEncoder<'a> {
    basis: &'a SymbolBasis,
    ngram: usize,
    tie_break: TieBreak,
}

impl<'a> TextEncoder<'a> {
    /// Fails with [`LangHdError::InvalidNgram`] when `ngram == 0`.
    pub fn new(basis: &'a SymbolBasis, ngram: usize) -> Result<Self> {
        if ngram < 1 {
            return Err(LangHdError::InvalidNgram(ngram));
        }
        Ok(Self {
            basis,
            ngram,
            tie_break: TieBreak::default(),
        })
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn ngram(&self) -> usize {
        self.ngram
    }

    pub fn dim(&self) -> usize {
        self.basis.dim()
    }

    /// Encode one n-gram window of normalized bytes.
    fn encode_window(&self, window: &[u8]) -> Result<HyperVector> {
        let n = window.len();
        let mut acc = HyperVector::zeros(self.dim());
        for (j, &code) in window.iter().enumerate() {
            let symbol = self
                .basis
                .get(code)
                .ok_or(LangHdError::UnknownSymbol(code))?;
            acc.xor(&symbol.rotate(n - 1 - j))?;
        }
        Ok(acc)
    }

    /// One vector per n-gram window of already-normalized text, in order.
    pub fn ngram_vectors(&self, text: &[u8]) -> Result<Vec<HyperVector>> {
        if text.len() < self.ngram {
            return Ok(Vec::new());
        }
        text.windows(self.ngram)
            .map(|w| self.encode_window(w))
            .collect()
    }

    /// Aggregate vector for a raw document.
    ///
    /// Documents with fewer than `ngram` usable characters get
    /// [`HyperVector::all_ones`]. `source` is only drawn from when the
    /// tie-break policy adds a random vector.
    pub fn encode(&self, raw: &[u8], source: &mut RandomVectorSource) -> Result<HyperVector> {
        let text = normalize(raw);
        let mut ngrams = self.ngram_vectors(&text)?;
        if ngrams.is_empty() {
            warn!(
                chars = text.len(),
                ngram = self.ngram,
                "no complete n-gram in document, using all-ones sentinel"
            );
            return Ok(HyperVector::all_ones(self.dim()));
        }

        let count = ngrams.len();
        if count % 2 == 0 && self.tie_break == TieBreak::RandomVector {
            ngrams.push(HyperVector::random(self.dim(), source));
        }

        let mut aggregate = HyperVector::zeros(self.dim());
        aggregate.bundle(&ngrams)?;
        debug!(ngrams = count, bundled = ngrams.len(), "encoded document");
        Ok(aggregate)
    }
}
