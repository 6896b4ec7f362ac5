//! CLI output formatting.
//!
//! Output leads with what the album contains (pages and their entries), with
//! file names shown as secondary context after a `→`. The last line of every
//! command is the one thing a script would want: the local root document for
//! `generate`, the public URL for `upload` and `publish`.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! index.html (12 entries)
//!     001 beach.jpg → images/image_1.html
//!     002 notes.pdf → images/notes.pdf
//!     ...
//! page1.html (1 entry)
//!     013 waves.mp4 → images/waves.mp4
//!
//! Generated 13 entries (11 photos, 1 movie, 1 document) on 2 pages
//! /home/me/albums/alice/summertrip/index.html
//! ```
//!
//! ## Upload
//!
//! ```text
//! Uploaded 31 files to /srv/albums/alice/summertrip (5 directories created)
//! https://example.org/srv/albums/alice/summertrip/index.html
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::GenerateResult;
use crate::layout::Layout;
use crate::sync::SyncResult;
use crate::types::MediaKind;

/// Format a 1-based sequence number as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `"1 entry"`, `"3 entries"`
fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Page-by-page inventory of a layout.
fn layout_lines(layout: &Layout) -> Vec<String> {
    let mut lines = Vec::new();
    for page in &layout.pages {
        lines.push(format!(
            "{} ({})",
            page.file_name,
            plural(page.len(), "entry", "entries")
        ));
        for entry in layout.page_entries(page) {
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(entry.sequence_number),
                entry.file_name,
                entry.link()
            ));
        }
    }
    lines
}

fn kind_summary(layout: &Layout) -> String {
    let count = |kind: MediaKind| layout.entries.iter().filter(|e| e.kind == kind).count();
    [
        (MediaKind::Image, "photo", "photos"),
        (MediaKind::Movie, "movie", "movies"),
        (MediaKind::Document, "document", "documents"),
    ]
    .into_iter()
    .filter_map(|(kind, one, many)| {
        let n = count(kind);
        (n > 0).then(|| plural(n, one, many))
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Format the result of a generation pass.
pub fn format_generate_output(result: &GenerateResult) -> Vec<String> {
    let layout = &result.layout;
    let mut lines = layout_lines(layout);
    lines.push(String::new());

    let entries = plural(layout.entries.len(), "entry", "entries");
    let pages = plural(layout.pages.len(), "page", "pages");
    let summary = kind_summary(layout);
    if summary.is_empty() {
        lines.push(format!("Generated {entries} on {pages}"));
    } else {
        lines.push(format!("Generated {entries} ({summary}) on {pages}"));
    }
    lines.push(result.index_path.display().to_string());
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(result: &GenerateResult) {
    for line in format_generate_output(result) {
        println!("{}", line);
    }
}

/// Format the result of a publish.
pub fn format_sync_output(result: &SyncResult) -> Vec<String> {
    vec![
        format!(
            "Uploaded {} to {} ({} created)",
            plural(result.stats.files_uploaded, "file", "files"),
            result.remote_path,
            plural(result.stats.dirs_created, "directory", "directories")
        ),
        result.url.clone(),
    ]
}

/// Print sync output to stdout.
pub fn print_sync_output(result: &SyncResult) {
    for line in format_sync_output(result) {
        println!("{}", line);
    }
}

/// Format a layout as pretty JSON for the `plan` command.
pub fn format_plan_output(layout: &Layout) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(layout)
}
