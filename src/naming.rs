//! Deterministic names for everything the pipeline writes.
//!
//! Output names depend only on sequence numbers, page numbers and the input
//! directory name, so re-running a generation over unchanged input reproduces
//! the same file tree:
//!
//! - `image_<n>.html`: detail page for the entry with sequence number `n`
//! - `index.html`, `page1.html`, `page2.html`, …: index pages
//! - `<local_dir>/<who>/<album>/`: album directory, where `<album>` is the
//!   input directory name lower-cased with spaces removed

use std::path::Path;

/// Name of the site root document (index page 0).
pub const ROOT_DOCUMENT: &str = "index.html";

/// Subdirectory holding detail pages, display variants and copied originals.
pub const IMAGES_DIR: &str = "images";
/// Subdirectory holding thumbnails.
pub const THUMBS_DIR: &str = "thumbs";
/// Subdirectory holding the style's static assets.
pub const RESOURCES_DIR: &str = "resources";

/// Subdirectories mirrored by the sync step, in upload order.
pub const MIRRORED_DIRS: [&str; 3] = [IMAGES_DIR, RESOURCES_DIR, THUMBS_DIR];

/// Detail page name for a 1-based sequence number.
pub fn detail_file_name(sequence_number: usize) -> String {
    format!("image_{sequence_number}.html")
}

/// Index page name for a 0-based page number.
///
/// Page 0 is the root document; later pages are `page<N>.html`.
pub fn page_file_name(page_number: usize) -> String {
    if page_number == 0 {
        ROOT_DOCUMENT.to_string()
    } else {
        format!("page{page_number}.html")
    }
}

/// Album directory name: the input directory's own name, lower-cased, with
/// spaces removed. `None` when the path has no final component (e.g. `/`).
///
/// - `"/photos/Summer Trip"` → `"summertrip"`
/// - `"School Work 2024"` → `"schoolwork2024"`
pub fn album_dir_name(input_dir: &Path) -> Option<String> {
    let name = input_dir.file_name()?.to_string_lossy();
    let cleaned: String = name.to_lowercase().chars().filter(|c| *c != ' ').collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Remote album path: `<base>/<who>/<album>`.
///
/// A trailing slash on `base` is dropped so the join never doubles it.
pub fn remote_album_path(base: &str, who: &str, album: &str) -> String {
    format!("{}/{who}/{album}", base.trim_end_matches('/'))
}

/// Public URL of a published album's root document.
///
/// The configured base URL is concatenated with the remote album path as-is;
/// the web server is expected to map the remote directory tree onto its URL
/// space.
pub fn public_url(url_base: &str, remote_album_path: &str) -> String {
    format!("{url_base}{remote_album_path}/{ROOT_DOCUMENT}")
}

/// Upper-case the first character (`"alice"` → `"Alice"`).
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_names_follow_sequence() {
        assert_eq!(detail_file_name(1), "image_1.html");
        assert_eq!(detail_file_name(25), "image_25.html");
    }

    #[test]
    fn page_zero_is_root_document() {
        assert_eq!(page_file_name(0), "index.html");
        assert_eq!(page_file_name(1), "page1.html");
        assert_eq!(page_file_name(12), "page12.html");
    }

    #[test]
    fn album_dir_name_strips_spaces_and_lowercases() {
        assert_eq!(
            album_dir_name(Path::new("/photos/Summer Trip")).as_deref(),
            Some("summertrip")
        );
        assert_eq!(
            album_dir_name(Path::new("School Work 2024")).as_deref(),
            Some("schoolwork2024")
        );
    }

    #[test]
    fn album_dir_name_ignores_trailing_slash() {
        assert_eq!(
            album_dir_name(Path::new("/photos/Art/")).as_deref(),
            Some("art")
        );
    }

    #[test]
    fn album_dir_name_none_for_root_or_blank() {
        assert_eq!(album_dir_name(Path::new("/")), None);
        assert_eq!(album_dir_name(Path::new("/photos/   ")), None);
    }

    #[test]
    fn remote_path_joins_components() {
        assert_eq!(
            remote_album_path("/srv/albums", "alice", "art"),
            "/srv/albums/alice/art"
        );
        assert_eq!(
            remote_album_path("/srv/albums/", "alice", "art"),
            "/srv/albums/alice/art"
        );
    }

    #[test]
    fn public_url_concatenates_base_and_path() {
        assert_eq!(
            public_url("https://example.org", "/srv/albums/alice/art"),
            "https://example.org/srv/albums/alice/art/index.html"
        );
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("alice"), "Alice");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éva"), "Éva");
    }
}
