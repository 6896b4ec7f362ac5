//! Input directory scanning and media classification.
//!
//! Stage 1 of the pipeline. Lists the files directly inside the input
//! directory (no recursion), sorts them by file name and tags each with a
//! [`MediaKind`] by looking its suffix up in the configured tables.
//!
//! ```text
//! Summer Trip/
//! ├── 01-beach.JPG        → Image     (suffix match is case-insensitive)
//! ├── 02-waves.mp4        → Movie
//! ├── notes.pdf           → Document
//! ├── desktop.ini         → skipped   (unknown suffix)
//! └── raw/                → skipped   (directories never participate)
//! ```
//!
//! Ordering is byte-wise lexicographic on the file name, so `B.jpg` sorts
//! before `a.jpg`. Directory traversal order is never relied upon.

use crate::config::{SuffixConfig, normalize_suffix};
use crate::types::MediaKind;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Input directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Suffix → kind lookup built from [`SuffixConfig`].
#[derive(Debug, Clone, Default)]
pub struct SuffixTable {
    kinds: HashMap<String, MediaKind>,
}

impl SuffixTable {
    pub fn from_config(config: &SuffixConfig) -> Self {
        let mut kinds = HashMap::new();
        let tables = [
            (MediaKind::Image, &config.image),
            (MediaKind::Movie, &config.movie),
            (MediaKind::Document, &config.document),
        ];
        for (kind, suffixes) in tables {
            for suffix in suffixes {
                kinds.entry(normalize_suffix(suffix)).or_insert(kind);
            }
        }
        Self { kinds }
    }

    /// Kind for a path, or `None` when its suffix is not configured.
    pub fn kind_of(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?;
        self.kinds.get(&format!(".{}", ext.to_lowercase())).copied()
    }
}

/// One recognized input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: MediaKind,
}

/// Scan `input_dir` and return every recognized file, sorted by name.
pub fn classify(input_dir: &Path, table: &SuffixTable) -> Result<Vec<ClassifiedFile>, ClassifyError> {
    if !input_dir.is_dir() {
        return Err(ClassifyError::NotADirectory(input_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| ClassifyError::Walk {
            path: input_dir.to_path_buf(),
            source,
        })?;
        let path = entry.into_path();
        let Some(kind) = table.kind_of(&path) else {
            tracing::debug!(path = %path.display(), "Skipping unrecognized file");
            continue;
        };
        // Symlinks count when they resolve to a regular file.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!(file = %file_name, %kind, "Adding");
        files.push(ClassifiedFile {
            path,
            file_name,
            kind,
        });
    }

    Ok(files)
}
