use crate::error::{DocMailsError, Result};
use crate::formats::FormatRegistry;
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub extension: String,
}

impl DocumentFile {
    pub fn new(source_path: PathBuf, relative_path: PathBuf) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            source_path,
            relative_path,
            filename,
            extension,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// Recursive walker collecting every file with a supported extension.
pub struct DocumentScanner {
    filter: FileFilter,
}

impl DocumentScanner {
    pub fn new(registry: &FormatRegistry) -> Self {
        Self {
            filter: FileFilter::new(registry),
        }
    }

    /// Sorted by full path. An empty result is not an error, an unreadable
    /// root is; unreadable subdirectories are skipped.
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DocumentFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(DocMailsError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(DocMailsError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut documents = Vec::new();

        let walker = WalkDir::new(root_path).follow_links(false).into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 || err.path() == Some(root_path) => {
                    return Err(DocMailsError::InvalidPath {
                        path: format!("{} is not readable: {}", root_path.display(), err),
                    });
                }
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_file() {
                if let Some(doc_file) = self.process_file(&entry, root_path) {
                    documents.push(doc_file);
                }
            }
        }

        documents.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        tracing::debug!(
            "Found {} supported file(s) under {} (extensions: {})",
            documents.len(),
            root_path.display(),
            self.filter.get_extensions().join(", ")
        );

        Ok(documents)
    }

    fn process_file(&self, entry: &DirEntry, root_path: &Path) -> Option<DocumentFile> {
        let path = entry.path();

        if !self.filter.is_supported_file(path) {
            return None;
        }

        let relative_path = path
            .strip_prefix(root_path)
            .unwrap_or(path)
            .to_path_buf();

        Some(DocumentFile::new(path.to_path_buf(), relative_path))
    }
}
