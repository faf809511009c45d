//! Vector cache
//!
//! Key-value byte store for generated basis vectors and trained profiles.
//! Keys are `characters/<code>` and `languages/<fileName>`; values are a JSON
//! array of `dim` bytes, each 0 or 1, in bit-index order.

use crate::error::{LangHdError, Result};
use crate::hypervector::HyperVector;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Namespace for symbol basis vectors.
pub const CHARACTERS: &str = "characters";
/// Namespace for trained language profiles.
pub const LANGUAGES: &str = "languages";

/// Address of one cached vector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Character(u8),
    Language(String),
}

impl CacheKey {
    pub fn namespace(&self) -> &'static str {
        match self {
            CacheKey::Character(_) => CHARACTERS,
            CacheKey::Language(_) => LANGUAGES,
        }
    }

    fn entry_name(&self) -> String {
        match self {
            CacheKey::Character(code) => code.to_string(),
            CacheKey::Language(name) => name.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace(), self.entry_name())
    }
}

/// Serialize a vector to the cache wire form.
pub fn encode_vector(vector: &HyperVector) -> Vec<u8> {
    // A Vec<u8> always serializes; the fallback is unreachable in practice.
    serde_json::to_vec(&vector.to_bits()).unwrap_or_default()
}

/// Parse the cache wire form, requiring exactly `dim` binary values.
pub fn decode_vector(key: &CacheKey, bytes: &[u8], dim: usize) -> Result<HyperVector> {
    let bits: Vec<u8> = serde_json::from_slice(bytes).map_err(|e| LangHdError::CacheCorrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    HyperVector::from_bits(&bits, dim).map_err(|e| LangHdError::CacheCorrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Byte store backing the vector cache.
///
/// Implementations overwrite silently on `store` and report a missing entry as
/// `Ok(None)` from `load`.
pub trait VectorCache: Send + Sync {
    /// Create the `characters` and `languages` namespaces. Idempotent.
    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;

    fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<()>;

    /// Load and decode a vector of `dim` bits.
    fn load_vector(&self, key: &CacheKey, dim: usize) -> Result<Option<HyperVector>> {
        match self.load(key)? {
            Some(bytes) => decode_vector(key, &bytes, dim).map(Some),
            None => Ok(None),
        }
    }

    fn store_vector(&self, key: &CacheKey, vector: &HyperVector) -> Result<()> {
        self.store(key, &encode_vector(vector))
    }
}

/// Cache rooted at a directory: `<root>/characters/<code>`, `<root>/languages/<name>`.
#[derive(Clone, Debug)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.namespace()).join(key.entry_name())
    }
}

impl VectorCache for DirectoryCache {
    fn prepare(&self) -> Result<()> {
        for ns in [CHARACTERS, LANGUAGES] {
            let dir = self.root.join(ns);
            fs::create_dir_all(&dir).map_err(|e| LangHdError::io(&dir, e))?;
        }
        Ok(())
    }

    fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LangHdError::io(path, e)),
        }
    }

    fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LangHdError::io(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| LangHdError::io(path, e))
    }
}

/// In-process cache, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries().contains_key(&key.to_string())
    }
}

impl VectorCache for MemoryCache {
    fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        Ok(self.entries().get(&key.to_string()).cloned())
    }

    fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<()> {
        self.entries().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
