//! Shared types used across the generation pipeline.

use serde::Serialize;
use std::fmt;

/// Media kind assigned to an input file by suffix lookup.
///
/// Only [`MediaKind::Image`] entries get thumbnail and display variants.
/// Movies and documents are copied verbatim next to the detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Movie,
    Document,
}

impl MediaKind {
    pub fn is_image(self) -> bool {
        matches!(self, MediaKind::Image)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Movie => "movie",
            MediaKind::Document => "document",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
