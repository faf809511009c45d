//! Dense binary hypervectors
//!
//! A `HyperVector` is a fixed-length sequence of `dim` bits packed into `u64`
//! words (bit `i` lives in word `i / 64`, position `i % 64`). All operations
//! work a word at a time:
//!
//! - Rotate (ρ): circular right shift, encodes position inside an n-gram
//! - Xor (⊗): binding, self-inverse
//! - Bundle (⊕): strict-majority vote over many vectors
//! - Similarity: binary cosine `|A∩B| / sqrt(|A|·|B|)`
//!
//! # Representation
//!
//! ```text
//! words: Vec<u64>  ──→  [b₀b₁b₂...b₆₃|b₆₄b₆₅...b₁₂₇|...]
//! ```
//!
//! Bits past `dim` in the final word are kept at zero so that popcounts and
//! shifts never see garbage.

use crate::error::{LangHdError, Result};
use crate::rng::RandomVectorSource;
use std::sync::OnceLock;

/// Binary hypervector with a memoized norm.
///
/// Every mutation goes through `&mut self` and resets the cached norm.
#[derive(Debug, Clone)]
pub struct HyperVector {
    dim: usize,
    words: Vec<u64>,
    /// `sqrt(popcount)`, computed on first read after a mutation.
    norm: OnceLock<f64>,
}

impl PartialEq for HyperVector {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim && self.words == other.words
    }
}

impl Eq for HyperVector {}

/// Number of u64 words needed for `dim` bits.
#[inline(always)]
const fn word_count(dim: usize) -> usize {
    (dim + 63) / 64
}

/// Mask for valid bits in the last word.
#[inline(always)]
const fn last_word_mask(dim: usize) -> u64 {
    let bits_used = dim % 64;
    if bits_used == 0 {
        !0u64
    } else {
        (1u64 << bits_used) - 1
    }
}

impl HyperVector {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// All-zero vector of `dim` bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::HyperVector;
    ///
    /// let v = HyperVector::zeros(100);
    /// assert_eq!(v.dim(), 100);
    /// assert_eq!(v.popcount(), 0);
    /// ```
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            words: vec![0u64; word_count(dim)],
            norm: OnceLock::new(),
        }
    }

    /// Every bit set. Used as the sentinel for documents with no usable n-grams.
    pub fn all_ones(dim: usize) -> Self {
        let mut words = vec![!0u64; word_count(dim)];
        if let Some(last) = words.last_mut() {
            *last &= last_word_mask(dim);
        }
        Self {
            dim,
            words,
            norm: OnceLock::new(),
        }
    }

    /// Uniformly random vector drawn from `source`.
    pub fn random(dim: usize, source: &mut RandomVectorSource) -> Self {
        Self {
            dim,
            words: source.random_words(dim),
            norm: OnceLock::new(),
        }
    }

    /// Wrap a bit sequence of one value per position (each `0` or `1`).
    ///
    /// Fails with [`LangHdError::MalformedCache`] when the sequence is not
    /// exactly `dim` long or holds anything other than 0/1.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::HyperVector;
    ///
    /// let v = HyperVector::from_bits(&[1, 0, 1, 1], 4).unwrap();
    /// assert_eq!(v.to_bits(), vec![1, 0, 1, 1]);
    /// assert!(HyperVector::from_bits(&[1, 0], 4).is_err());
    /// ```
    pub fn from_bits(bits: &[u8], dim: usize) -> Result<Self> {
        if bits.len() != dim || bits.iter().any(|&b| b > 1) {
            return Err(LangHdError::MalformedCache {
                expected: dim,
                got: bits.len(),
            });
        }
        let mut words = vec![0u64; word_count(dim)];
        for (i, &b) in bits.iter().enumerate() {
            words[i / 64] |= u64::from(b) << (i % 64);
        }
        Ok(Self {
            dim,
            words,
            norm: OnceLock::new(),
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Number of bits.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Read-only access to the packed words.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Bit `i`; out-of-range reads are `false`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        if i >= self.dim {
            return false;
        }
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Set bit `i`; out-of-range writes are ignored.
    pub fn set(&mut self, i: usize, bit: bool) {
        if i >= self.dim {
            return;
        }
        let mask = 1u64 << (i % 64);
        if bit {
            self.words[i / 64] |= mask;
        } else {
            self.words[i / 64] &= !mask;
        }
        self.invalidate_norm();
    }

    /// One byte per bit, in index order. This is the cache wire form.
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.dim).map(|i| u8::from(self.get(i))).collect()
    }

    /// Hamming weight.
    pub fn popcount(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// `sqrt(popcount)`, memoized until the next mutation.
    pub fn norm(&self) -> f64 {
        *self.norm.get_or_init(|| (self.popcount() as f64).sqrt())
    }

    /// The memoized norm, if it has been computed since the last mutation.
    pub fn cached_norm(&self) -> Option<f64> {
        self.norm.get().copied()
    }

    #[inline]
    fn invalidate_norm(&mut self) {
        self.norm = OnceLock::new();
    }

    fn check_dim(&self, other: &HyperVector) -> Result<()> {
        if self.dim != other.dim {
            return Err(LangHdError::DimensionMismatch {
                expected: self.dim,
                got: other.dim,
            });
        }
        Ok(())
    }

    // ========================================================================
    // CORE HDC OPERATIONS
    // ========================================================================

    /// Circular right rotation by `amount` positions: bit `i` moves to
    /// `(i + amount) % dim`. Returns a new vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::HyperVector;
    ///
    /// let v = HyperVector::from_bits(&[1, 0, 0, 0, 1], 5).unwrap();
    /// assert_eq!(v.rotate(1).to_bits(), vec![1, 1, 0, 0, 0]);
    /// assert_eq!(v.rotate(5), v);
    /// ```
    pub fn rotate(&self, amount: usize) -> HyperVector {
        if self.dim == 0 {
            return self.clone();
        }
        let k = amount % self.dim;
        if k == 0 {
            return self.clone();
        }

        let up = shift_up(&self.words, k);
        let down = shift_down(&self.words, self.dim - k);
        let mut words: Vec<u64> = up.iter().zip(&down).map(|(a, b)| a | b).collect();
        if let Some(last) = words.last_mut() {
            *last &= last_word_mask(self.dim);
        }

        HyperVector {
            dim: self.dim,
            words,
            norm: OnceLock::new(),
        }
    }

    /// In-place binding: `self[i] ^= other[i]`.
    pub fn xor(&mut self, other: &HyperVector) -> Result<()> {
        self.check_dim(other)?;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= *b;
        }
        self.invalidate_norm();
        Ok(())
    }

    /// In-place strict-majority bundle of `vectors`.
    ///
    /// Bit `i` becomes 1 iff at least `n / 2 + 1` inputs have it set, so with
    /// an even `n` an exact half/half split resolves to 0. A single input is
    /// copied verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::HyperVector;
    ///
    /// let a = HyperVector::from_bits(&[1, 1, 0], 3).unwrap();
    /// let b = HyperVector::from_bits(&[1, 0, 0], 3).unwrap();
    /// let c = HyperVector::from_bits(&[0, 1, 1], 3).unwrap();
    ///
    /// let mut out = HyperVector::zeros(3);
    /// out.bundle(&[a, b, c]).unwrap();
    /// assert_eq!(out.to_bits(), vec![1, 1, 0]);
    /// ```
    pub fn bundle(&mut self, vectors: &[HyperVector]) -> Result<()> {
        let first = vectors.first().ok_or(LangHdError::EmptyBundle)?;
        for v in vectors {
            self.check_dim(v)?;
        }

        if vectors.len() == 1 {
            self.words.clone_from(&first.words);
            self.invalidate_norm();
            return Ok(());
        }

        let mut counts = vec![0u32; self.dim];
        for v in vectors {
            for (w_idx, &word) in v.words.iter().enumerate() {
                let mut w = word;
                while w != 0 {
                    let bit = w.trailing_zeros() as usize;
                    counts[w_idx * 64 + bit] += 1;
                    w &= w - 1;
                }
            }
        }

        let threshold = (vectors.len() / 2 + 1) as u32;
        self.words.iter_mut().for_each(|w| *w = 0);
        for (i, &count) in counts.iter().enumerate() {
            if count >= threshold {
                self.words[i / 64] |= 1u64 << (i % 64);
            }
        }
        self.invalidate_norm();
        Ok(())
    }

    /// Number of positions set in both vectors.
    pub fn dot(&self, other: &HyperVector) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Binary cosine similarity in `[0, 1]`.
    ///
    /// Returns `0.0` when either vector has no bits set.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::{HyperVector, RandomVectorSource};
    ///
    /// let mut rng = RandomVectorSource::seeded(1);
    /// let v = HyperVector::random(1000, &mut rng);
    /// assert!((v.similarity(&v) - 1.0).abs() < 1e-12);
    /// assert_eq!(v.similarity(&HyperVector::zeros(1000)), 0.0);
    /// ```
    pub fn similarity(&self, other: &HyperVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        self.dot(other) as f64 / denom
    }
}

/// Multi-word left shift by `k` bits (towards higher bit indices).
fn shift_up(src: &[u64], k: usize) -> Vec<u64> {
    let n = src.len();
    let (ws, bs) = (k / 64, k % 64);
    let mut out = vec![0u64; n];
    for j in ws..n {
        let from = j - ws;
        let mut w = src[from] << bs;
        if bs > 0 && from > 0 {
            w |= src[from - 1] >> (64 - bs);
        }
        out[j] = w;
    }
    out
}

/// Multi-word right shift by `k` bits (towards lower bit indices).
fn shift_down(src: &[u64], k: usize) -> Vec<u64> {
    let n = src.len();
    let (ws, bs) = (k / 64, k % 64);
    let mut out = vec![0u64; n];
    for (j, slot) in out.iter_mut().enumerate() {
        let from = j + ws;
        if from >= n {
            break;
        }
        let mut w = src[from] >> bs;
        if bs > 0 && from + 1 < n {
            w |= src[from + 1] << (64 - bs);
        }
        *slot = w;
    }
    out
}
