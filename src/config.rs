//! Run configuration.

use crate::encoder::TieBreak;
use crate::error::{LangHdError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default hypervector dimensionality.
pub const DEFAULT_DIM: usize = 10_000;
/// Default n-gram width.
pub const DEFAULT_NGRAM: usize = 3;

/// Parameters for one classification session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bits per hypervector
    pub dim: usize,
    /// Consecutive characters per n-gram
    pub ngram: usize,
    /// Read and write the vector cache
    pub cache: bool,
    /// Root of the vector cache
    pub cache_dir: PathBuf,
    /// Training corpus; one language per file
    pub train: PathBuf,
    /// Documents to classify
    pub test: PathBuf,
    /// Fixed RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Even n-gram count handling
    pub tie_break: TieBreak,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dim: DEFAULT_DIM,
            ngram: DEFAULT_NGRAM,
            cache: true,
            cache_dir: PathBuf::from("cache"),
            train: PathBuf::from("data/train"),
            test: PathBuf::from("data/test"),
            seed: None,
            tie_break: TieBreak::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LangHdError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| {
            LangHdError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Reject parameters that would make the run meaningless.
    ///
    /// # Examples
    ///
    /// ```
    /// use langhd::Config;
    ///
    /// assert!(Config::default().validate().is_ok());
    /// let bad = Config { ngram: 0, ..Config::default() };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(LangHdError::InvalidDimension(self.dim));
        }
        if self.ngram < 1 {
            return Err(LangHdError::InvalidNgram(self.ngram));
        }
        Ok(())
    }
}
