//! Entry building and pagination.
//!
//! Pure layout computation: no filesystem access, no rendering. Given the
//! classifier's sorted file list and a page capacity, this module decides
//!
//! - each file's sequence number and detail page name,
//! - the previous/next detail links between neighbouring entries,
//! - which index page lists which entries, and
//! - the previous/next links between neighbouring index pages.
//!
//! ## Paging rules
//!
//! Entries are buffered in sequence order. Whenever the buffer reaches the
//! capacity it is sealed as a page; a non-empty remainder becomes the final,
//! shorter page. With no entries at all a single empty page 0 is produced,
//! so the root document always exists.
//!
//! ```text
//! 25 entries, capacity 12
//!
//! index.html  entries  1..=12   prev: -           next: page1.html
//! page1.html  entries 13..=24   prev: index.html  next: page2.html
//! page2.html  entry   25        prev: page1.html  next: -
//! ```
//!
//! A page is last exactly when it holds the final entry. When the entry count
//! is an exact multiple of the capacity, no trailing empty page is produced
//! and the last full page has no `next` link.

use crate::classify::ClassifiedFile;
use crate::imaging::ImageVariants;
use crate::naming::{self, IMAGES_DIR, THUMBS_DIR};
use crate::types::MediaKind;
use serde::Serialize;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Page capacity must be at least 1")]
    ZeroCapacity,
}

/// One input file's navigation record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub source_path: PathBuf,
    pub file_name: String,
    pub kind: MediaKind,
    /// 1-based position in the sorted file list.
    pub sequence_number: usize,
    /// `image_<sequence_number>.html`
    pub detail_file_name: String,
    pub prev_detail: Option<String>,
    pub next_detail: Option<String>,
    /// Index of the page listing this entry.
    pub owner_page: usize,
    /// Link from the detail page back to its index page (`../index.html`,
    /// `../page<N>.html`).
    pub index_link: String,
    /// Filled in once the variants have been written. Always `None` for
    /// movies and documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<ImageVariants>,
}

impl Entry {
    /// Link from an index page: detail page for photos, the copied original
    /// for movies and documents.
    pub fn link(&self) -> String {
        if self.kind.is_image() {
            format!("{IMAGES_DIR}/{}", self.detail_file_name)
        } else {
            format!("{IMAGES_DIR}/{}", self.file_name)
        }
    }

    /// Thumbnail path relative to the album root (photos only).
    pub fn thumbnail_relative_path(&self) -> Option<String> {
        self.kind
            .is_image()
            .then(|| format!("{THUMBS_DIR}/{}", self.file_name))
    }

    /// Display variant path relative to the album root (photos only).
    pub fn display_relative_path(&self) -> Option<String> {
        self.kind
            .is_image()
            .then(|| format!("{IMAGES_DIR}/{}", self.file_name))
    }

    /// Height used for page layout: the display variant's height when known,
    /// otherwise `default_height`.
    pub fn layout_height(&self, default_height: u32) -> u32 {
        self.variants
            .map(|v| v.display.height)
            .unwrap_or(default_height)
    }
}

/// One index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 0-based page number.
    pub page_number: usize,
    /// `index.html` for page 0, `page<N>.html` otherwise.
    pub file_name: String,
    /// Positions (0-based) of this page's entries in [`Layout::entries`].
    pub entries: Range<usize>,
    pub prev_file_name: Option<String>,
    pub next_file_name: Option<String>,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.next_file_name.is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Entries and pages for one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub capacity: usize,
    pub entries: Vec<Entry>,
    pub pages: Vec<Page>,
}

impl Layout {
    /// Entries listed on `page`.
    pub fn page_entries(&self, page: &Page) -> &[Entry] {
        &self.entries[page.entries.clone()]
    }

    /// The root page (page 0), which always exists.
    pub fn root_page(&self) -> &Page {
        &self.pages[0]
    }

    pub fn image_count(&self) -> usize {
        self.entries.iter().filter(|e| e.kind.is_image()).count()
    }
}

/// Build the full layout for a sorted file list.
pub fn build_layout(files: Vec<ClassifiedFile>, capacity: usize) -> Result<Layout, LayoutError> {
    if capacity == 0 {
        return Err(LayoutError::ZeroCapacity);
    }
    let entries = build_entries(files, capacity);
    let pages = paginate(entries.len(), capacity);
    Ok(Layout {
        capacity,
        entries,
        pages,
    })
}

/// Page number owning the entry with the given 1-based sequence number.
pub fn owner_page(sequence_number: usize, capacity: usize) -> usize {
    (sequence_number - 1) / capacity
}

/// Assign sequence numbers, detail names and neighbour links.
///
/// `capacity` must be non-zero; [`build_layout`] checks it.
pub fn build_entries(files: Vec<ClassifiedFile>, capacity: usize) -> Vec<Entry> {
    let total = files.len();
    files
        .into_iter()
        .enumerate()
        .map(|(idx, file)| {
            let sequence_number = idx + 1;
            let owner = owner_page(sequence_number, capacity);
            Entry {
                source_path: file.path,
                file_name: file.file_name,
                kind: file.kind,
                sequence_number,
                detail_file_name: naming::detail_file_name(sequence_number),
                prev_detail: (sequence_number > 1)
                    .then(|| naming::detail_file_name(sequence_number - 1)),
                next_detail: (sequence_number < total)
                    .then(|| naming::detail_file_name(sequence_number + 1)),
                owner_page: owner,
                index_link: format!("../{}", naming::page_file_name(owner)),
                variants: None,
            }
        })
        .collect()
}

/// Group `entry_count` entries into pages of `capacity`.
///
/// `capacity` must be non-zero; [`build_layout`] checks it.
pub fn paginate(entry_count: usize, capacity: usize) -> Vec<Page> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut start = 0;
    for end in 1..=entry_count {
        if end - start == capacity {
            ranges.push(start..end);
            start = end;
        }
    }
    if start < entry_count || ranges.is_empty() {
        ranges.push(start..entry_count);
    }

    let last = ranges.len() - 1;
    ranges
        .into_iter()
        .enumerate()
        .map(|(page_number, entries)| Page {
            page_number,
            file_name: naming::page_file_name(page_number),
            entries,
            prev_file_name: (page_number > 0).then(|| naming::page_file_name(page_number - 1)),
            next_file_name: (page_number < last).then(|| naming::page_file_name(page_number + 1)),
        })
        .collect()
}
