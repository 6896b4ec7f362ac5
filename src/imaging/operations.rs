//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{FitParams, Quality};
use crate::config::AlbumConfig;
use serde::Serialize;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Bounding boxes and quality for the two variants of every photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSpec {
    pub thumbnail_box: (u32, u32),
    pub display_box: (u32, u32),
    pub quality: Quality,
}

impl VariantSpec {
    pub fn from_config(config: &AlbumConfig) -> Self {
        Self {
            thumbnail_box: config.thumbnail_box(),
            display_box: config.display_box(),
            quality: Quality::new(config.images.quality),
        }
    }
}

/// Achieved dimensions of both variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageVariants {
    pub thumbnail: Dimensions,
    pub display: Dimensions,
}

/// Plan both variant operations without executing them.
///
/// Variants keep the source file name: the thumbnail goes to
/// `thumbs_dir/<name>`, the display copy to `images_dir/<name>`.
pub fn plan_variants(
    source: &Path,
    thumbs_dir: &Path,
    images_dir: &Path,
    spec: &VariantSpec,
) -> [FitParams; 2] {
    let name = source.file_name().unwrap_or(source.as_os_str());
    let plan = |dir: &Path, (max_width, max_height): (u32, u32)| FitParams {
        source: source.to_path_buf(),
        output: dir.join(name),
        max_width,
        max_height,
        quality: spec.quality,
    };
    [
        plan(thumbs_dir, spec.thumbnail_box),
        plan(images_dir, spec.display_box),
    ]
}

/// Create the thumbnail and display-size variants of one photo.
pub fn create_variants(
    backend: &impl ImageBackend,
    source: &Path,
    thumbs_dir: &Path,
    images_dir: &Path,
    spec: &VariantSpec,
) -> Result<ImageVariants> {
    let params = plan_variants(source, thumbs_dir, images_dir, spec);
    let dims = backend.fit_all(&params)?;
    let variants = match dims.as_slice() {
        [thumbnail, display] => ImageVariants {
            thumbnail: *thumbnail,
            display: *display,
        },
        _ => {
            return Err(BackendError::Encode {
                path: source.to_path_buf(),
                message: format!("backend returned {} results for 2 variants", dims.len()),
            });
        }
    };
    let thumb_size = format!("{}x{}", variants.thumbnail.width, variants.thumbnail.height);
    let display_size = format!("{}x{}", variants.display.width, variants.display.height);
    tracing::info!(
        file = %source.display(),
        thumb = %thumb_size,
        display = %display_size,
        "Created variants"
    );
    Ok(variants)
}
