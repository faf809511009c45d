//! Corpus discovery: every regular file under a directory becomes one document.

use crate::error::{LangHdError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A named raw document. `name` is the file name without its directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Read all regular files under `dir`, recursively, in sorted path order.
///
/// Subdirectories are traversed but carry no meaning; two files with the same
/// name in different subdirectories produce two documents with the same name.
pub fn read_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let dir = dir.as_ref();

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            LangHdError::io(path, source)
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let bytes = fs::read(&path).map_err(|e| LangHdError::io(&path, e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Document { name, path, bytes })
        })
        .collect()
}
