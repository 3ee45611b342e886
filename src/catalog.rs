//! Input directory scanning and classification

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::MatrixClass;
use crate::error::{BenchError, Result};

/// A candidate matrix file and its size on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub size: u64,
}

impl CatalogEntry {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// File name component, used to name the output file
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Snapshot of the dense and sparse files found in one directory
#[derive(Debug, Clone, Default)]
pub struct MatrixCatalog {
    dense: Vec<CatalogEntry>,
    sparse: Vec<CatalogEntry>,
}

impl MatrixCatalog {
    /// Scan `dir` and split its regular files (or links to them) into dense and sparse groups
    ///
    /// Entries keep directory-enumeration order. Every call re-reads the
    /// directory.
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let read_dir = fs::read_dir(dir).map_err(|e| BenchError::io(dir, e))?;

        let mut catalog = MatrixCatalog::default();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| BenchError::io(dir, e))?;
            let path = dir_entry.path();
            // Follows symlinks, so a linked data set is sized by its target
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if is_symlink(&dir_entry) => {
                    debug!(file = %path.display(), error = %e, "skipping dangling symlink");
                    continue;
                }
                Err(e) => return Err(BenchError::io(&path, e)),
            };
            if !metadata.is_file() {
                continue;
            }

            let file_name = dir_entry.file_name().to_string_lossy().into_owned();
            match MatrixClass::classify(&file_name) {
                Some(MatrixClass::Dense) => {
                    catalog.dense.push(CatalogEntry::new(path, metadata.len()))
                }
                Some(MatrixClass::Sparse) => {
                    catalog.sparse.push(CatalogEntry::new(path, metadata.len()))
                }
                None => debug!(file = %file_name, "skipping unclassified file"),
            }
        }

        debug!(
            dir = %dir.display(),
            dense = catalog.dense.len(),
            sparse = catalog.sparse.len(),
            "scanned input directory"
        );
        Ok(catalog)
    }

    /// Order both groups smallest-first
    pub fn sorted_by_size(mut self) -> Self {
        sort_by_size(&mut self.dense);
        sort_by_size(&mut self.sparse);
        self
    }

    pub fn dense(&self) -> &[CatalogEntry] {
        &self.dense
    }

    pub fn sparse(&self) -> &[CatalogEntry] {
        &self.sparse
    }

    pub fn len(&self) -> usize {
        self.dense.len() + self.sparse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_symlink(dir_entry: &fs::DirEntry) -> bool {
    dir_entry.file_type().map(|t| t.is_symlink()).unwrap_or(false)
}

/// Stable ascending sort by byte size
pub fn sort_by_size(entries: &mut [CatalogEntry]) {
    entries.sort_by_key(|e| e.size);
}
