//! Classification session
//!
//! Owns everything one run needs: the validated config, the symbol basis, the
//! random source, the optional vector cache, the trained classifier and the
//! encoded test samples. Work proceeds strictly in order:
//!
//! 1. [`Session::new`] builds the basis (cached or fresh)
//! 2. [`Session::encode_training_dir`] fills the reference set
//! 3. [`Session::encode_testing_dir`] encodes unknown documents
//! 4. [`Session::classify_all`] labels each test document
//!
//! Documents are encoded in parallel; each gets its own child random stream
//! derived up front, so a seeded run is reproducible regardless of scheduling.

use crate::basis::SymbolBasis;
use crate::cache::{CacheKey, DirectoryCache, VectorCache};
use crate::classifier::{Classifier, TestSamples, Verdict};
use crate::config::Config;
use crate::corpus::{read_documents, Document};
use crate::encoder::TextEncoder;
use crate::error::Result;
use crate::hypervector::HyperVector;
use crate::rng::RandomVectorSource;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Where freshly encoded documents go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Reference profiles; cached when caching is on.
    Training,
    /// Unknown samples; never cached.
    Testing,
}

pub struct Session {
    config: Config,
    source: RandomVectorSource,
    cache: Option<Box<dyn VectorCache>>,
    basis: SymbolBasis,
    classifier: Classifier,
    samples: TestSamples,
}

impl Session {
    /// Validate `config`, open the directory cache if enabled, build the basis.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let cache: Option<Box<dyn VectorCache>> = if config.cache {
            Some(Box::new(DirectoryCache::new(&config.cache_dir)))
        } else {
            None
        };
        Self::with_cache(config, cache)
    }

    /// Like [`Session::new`] with a caller-supplied cache (ignores
    /// `config.cache` and `config.cache_dir`).
    pub fn with_cache(config: Config, cache: Option<Box<dyn VectorCache>>) -> Result<Self> {
        config.validate()?;
        if let Some(c) = &cache {
            c.prepare()?;
        }

        let mut source = RandomVectorSource::from_seed_option(config.seed);
        let basis = SymbolBasis::build(config.dim, &mut source, cache.as_deref())?;

        Ok(Self {
            config,
            source,
            cache,
            basis,
            classifier: Classifier::new(),
            samples: TestSamples::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn basis(&self) -> &SymbolBasis {
        &self.basis
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn samples(&self) -> &TestSamples {
        &self.samples
    }

    /// Encoder bound to this session's basis and parameters.
    pub fn encoder(&self) -> Result<TextEncoder<'_>> {
        Ok(TextEncoder::new(&self.basis, self.config.ngram)?
            .with_tie_break(self.config.tie_break))
    }

    /// Encode every regular file under `dir` as a language profile.
    pub fn encode_training_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let docs = read_documents(dir.as_ref())?;
        info!(dir = %dir.as_ref().display(), files = docs.len(), "encoding training data");
        self.encode_documents(docs, Mode::Training)
    }

    /// Encode every regular file under `dir` as a test sample.
    pub fn encode_testing_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let docs = read_documents(dir.as_ref())?;
        info!(dir = %dir.as_ref().display(), files = docs.len(), "encoding testing data");
        self.encode_documents(docs, Mode::Testing)
    }

    /// Encode `docs` and store them by name according to `mode`.
    ///
    /// In training mode with a cache, documents whose profile is already
    /// cached are loaded instead of re-encoded, and new profiles are written
    /// back. Returns the number of documents stored.
    pub fn encode_documents(&mut self, docs: Vec<Document>, mode: Mode) -> Result<usize> {
        let dim = self.config.dim;
        let mut ready: Vec<(String, HyperVector)> = Vec::new();
        let mut pending: Vec<Document> = Vec::new();

        for doc in docs {
            let cached = match (&self.cache, mode) {
                (Some(cache), Mode::Training) => {
                    cache.load_vector(&CacheKey::Language(doc.name.clone()), dim)?
                }
                _ => None,
            };
            match cached {
                Some(profile) => {
                    debug!(name = %doc.name, "loaded cached profile");
                    ready.push((doc.name, profile));
                }
                None => pending.push(doc),
            }
        }

        let sources: Vec<RandomVectorSource> =
            pending.iter().map(|_| self.source.derive()).collect();
        let encoder = self.encoder()?;
        let encoded: Vec<(String, HyperVector)> = pending
            .into_par_iter()
            .zip(sources.into_par_iter())
            .map(|(doc, mut source)| {
                let vector = encoder.encode(&doc.bytes, &mut source)?;
                Ok((doc.name, vector))
            })
            .collect::<Result<_>>()?;

        if mode == Mode::Training {
            if let Some(cache) = &self.cache {
                for (name, profile) in &encoded {
                    cache.store_vector(&CacheKey::Language(name.clone()), profile)?;
                }
            }
        }

        let mut stored: BTreeMap<String, HyperVector> = BTreeMap::new();
        for (name, vector) in ready.into_iter().chain(encoded) {
            if stored.insert(name.clone(), vector).is_some() {
                warn!(%name, "duplicate document name, keeping the later file");
            }
        }
        let count = stored.len();

        match mode {
            Mode::Training => self.classifier.train(stored),
            Mode::Testing => {
                for (name, vector) in stored {
                    if self.samples.insert(name.clone(), vector).is_some() {
                        warn!(%name, "test sample replaced");
                    }
                }
            }
        }
        Ok(count)
    }

    /// Label every encoded test sample.
    pub fn classify_all(&self) -> Vec<Verdict> {
        let verdicts = self.classifier.classify_all(&self.samples);
        info!(
            samples = verdicts.len(),
            languages = self.classifier.len(),
            "classification finished"
        );
        verdicts
    }
}
