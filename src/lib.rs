//! # Album Maker
//!
//! Turns one directory of photos, movie clips and documents into a paginated
//! static HTML album for a named recipient, and optionally publishes it to a
//! web server over SFTP.
//!
//! # Pipeline
//!
//! ```text
//! 1. Classify   input dir  →  sorted (file, kind) list   (suffix lookup)
//! 2. Lay out    file list  →  entries + pages            (pure, no I/O)
//! 3. Generate   layout     →  <local_dir>/<who>/<album>/ (variants, pages, resources)
//! 4. Sync       album tree →  <directory>/<who>/<album>/ (SFTP, optional)
//! ```
//!
//! Steps 1 and 2 never write anything, so the whole navigation structure can
//! be inspected (`album-maker plan`) and unit-tested without a filesystem.
//! Every output name is derived from sequence and page numbers, so re-running
//! any step over unchanged input reproduces the same tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation and the stock config text |
//! | [`types`] | Shared `MediaKind` enum |
//! | [`naming`] | Deterministic names: detail pages, index pages, album directory, remote path, URL |
//! | [`classify`] | Lists and classifies the input directory |
//! | [`imaging`] | Thumbnail and display variants: fit calculations, `ImageBackend`, pure Rust backend |
//! | [`layout`] | Entries, pagination and navigation links |
//! | [`render`] | Tera-backed styles and the template contexts |
//! | [`resources`] | Copies a style's static assets into the album |
//! | [`generate`] | `AlbumRun` and the I/O side of generation |
//! | [`sync`] | `RemoteFs`, directory ensure, tree upload, SFTP session |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Swappable Styles
//!
//! Pages are rendered with [Tera](https://keats.github.io/tera/) templates read
//! from a style directory, so a new look is a new directory rather than a new
//! build. The `default` style ships inside the binary. Templates only present
//! values; every link and number is computed in [`layout`] and [`render`].
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling). EXIF
//! orientation is applied before scaling so variants are always stored upright.
//! No ImageMagick, no system libraries.
//!
//! ## Probe Before Create
//!
//! Remote directories are probed first and created only on a definite absence.
//! A failed probe (permission denied, dropped connection) is an error, never
//! mistaken for "absent".

pub mod classify;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod layout;
pub mod naming;
pub mod output;
pub mod render;
pub mod resources;
pub mod sync;
pub mod types;
