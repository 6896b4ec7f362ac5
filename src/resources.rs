//! Copies a style's static assets into the album.
//!
//! Every file directly inside the style's `resources/` directory lands in
//! `<album>/resources/`. Existing files are overwritten; files that are not
//! part of the style are left alone.

use crate::naming::RESOURCES_DIR;
use crate::render::ResourceSource;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read resources in {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Copy all style resources into `<output_dir>/resources/`.
///
/// Returns the number of files copied. A style without a `resources/`
/// directory copies nothing.
pub fn copy_resources(source: &ResourceSource, output_dir: &Path) -> Result<usize, ResourceError> {
    let dest_dir = output_dir.join(RESOURCES_DIR);
    fs::create_dir_all(&dest_dir).map_err(|source| ResourceError::Io {
        path: dest_dir.clone(),
        source,
    })?;

    match source {
        ResourceSource::Embedded(files) => {
            for (name, contents) in files.iter() {
                let dest = dest_dir.join(name);
                fs::write(&dest, contents).map_err(|source| ResourceError::Io {
                    path: dest.clone(),
                    source,
                })?;
            }
            tracing::debug!(count = files.len(), "Wrote built-in resources");
            Ok(files.len())
        }
        ResourceSource::Directory(dir) => copy_dir_files(dir, &dest_dir),
    }
}

fn copy_dir_files(dir: &Path, dest_dir: &Path) -> Result<usize, ResourceError> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "Style has no resources directory");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ResourceError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let dest = dest_dir.join(entry.file_name());
        fs::copy(entry.path(), &dest).map_err(|source| ResourceError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        copied += 1;
    }
    tracing::debug!(dir = %dir.display(), count = copied, "Copied style resources");
    Ok(copied)
}
