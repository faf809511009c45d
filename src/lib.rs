//! LangHD - Language Identification with Hyperdimensional Computing
//!
//! Copyright (c) 2025 LangHD Contributors
//! Licensed under MIT License
//!
//! Identifies the language of a short text by encoding it as a binary
//! hypervector and picking the most similar of a set of per-language
//! reference vectors.
//!
//! # Quick Start
//!
//! ```
//! use langhd::{Classifier, RandomVectorSource, SymbolBasis, TextEncoder};
//!
//! let mut rng = RandomVectorSource::seeded(42);
//! let basis = SymbolBasis::build(4096, &mut rng, None)?;
//! let encoder = TextEncoder::new(&basis, 3)?;
//!
//! let mut clf = Classifier::new();
//! clf.train([
//!     ("en".to_string(), encoder.encode(b"the cat sat on the mat with the hat", &mut rng)?),
//!     ("de".to_string(), encoder.encode(b"die katze sass auf der matte mit dem hut", &mut rng)?),
//! ]);
//!
//! let sample = encoder.encode(b"the hat sat on the cat", &mut rng)?;
//! assert_eq!(clf.classify(&sample)?.label, "en");
//! # Ok::<(), langhd::LangHdError>(())
//! ```
//!
//! # Modules
//!
//! - [`hypervector`]: binary hypervector algebra (rotate, xor, bundle, similarity)
//! - [`rng`]: explicit, seedable random source
//! - [`basis`]: per-character random basis
//! - [`encoder`]: text normalization and n-gram encoding
//! - [`classifier`]: nearest-profile decision
//! - [`cache`]: on-disk / in-memory vector cache
//! - [`corpus`], [`config`], [`session`], [`cli`]: the run around the core

pub mod basis;
pub mod cache;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod encoder;
pub mod error;
pub mod hypervector;
pub mod rng;
pub mod session;

// Re-export main types for convenience
pub use basis::SymbolBasis;
pub use cache::{CacheKey, DirectoryCache, MemoryCache, VectorCache};
pub use classifier::{Classifier, LanguageProfiles, Prediction, TestSamples, Verdict};
pub use config::Config;
pub use encoder::{TextEncoder, TieBreak};
pub use error::{LangHdError, Result};
pub use hypervector::HyperVector;
pub use rng::RandomVectorSource;
pub use session::{Mode, Session};
