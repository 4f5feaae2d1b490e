// One document directory per category under the documents root
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::types::DocumentCategory;

pub trait PartitionProvider {
    /// Where the category's documents live (for trace output).
    fn location(&self, category: DocumentCategory) -> PathBuf;

    /// PDF files of the category, ordered by file name.
    fn list_pdf_files(&self, category: DocumentCategory) -> Result<Vec<PathBuf>, StorageError>;
}

#[derive(Debug, Clone)]
pub struct DocumentPartitions {
    root: PathBuf,
}

impl DocumentPartitions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create every category directory that is missing.
    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        for category in DocumentCategory::ALL {
            let dir = self.location(category);
            std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io { path: dir, source })?;
        }
        Ok(())
    }
}

impl PartitionProvider for DocumentPartitions {
    fn location(&self, category: DocumentCategory) -> PathBuf {
        self.root.join(category.dir_name())
    }

    fn list_pdf_files(&self, category: DocumentCategory) -> Result<Vec<PathBuf>, StorageError> {
        let dir = self.location(category);
        if !dir.is_dir() {
            return Err(StorageError::MissingPartition(dir));
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_pdf(path))
            .collect();
        files.sort();
        Ok(files)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
