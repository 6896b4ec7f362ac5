//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations the variant generator
//! needs: fit-within resize, singly or several from one source. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::FitParams;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Pixel dimensions of an image or variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can serve a rayon `par_iter`.
pub trait ImageBackend: Sync {
    /// Write an upright, fit-within copy of `params.source` to `params.output`.
    /// Returns the dimensions actually written.
    fn fit(&self, params: &FitParams) -> Result<Dimensions, BackendError>;

    /// Run several fit operations. Backends may override this to decode a
    /// shared source only once.
    fn fit_all(&self, params: &[FitParams]) -> Result<Vec<Dimensions>, BackendError> {
        params.iter().map(|p| self.fit(p)).collect()
    }
}
