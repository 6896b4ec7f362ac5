//! Descriptions of image work.
//!
//! [`operations`](super::operations) decides which variants a photo needs and
//! fills in [`FitParams`]; a [`backend`](super::backend) carries them out.
//! Tests swap in a recording backend and assert on the params alone.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a fit-within resize.
///
/// The output keeps the source aspect ratio, is never larger than the source,
/// and fits inside `max_width` × `max_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}
