//! Album generation.
//!
//! Drives one generation pass over an input directory and writes the album
//! tree. The pure parts (classification, layout) come first; everything that
//! touches the output directory happens afterwards, in this order:
//!
//! 1. Create `<album>/`, `images/` and `thumbs/`
//! 2. Write thumbnail and display variants for every photo (in parallel)
//! 3. Copy movie and document originals into `images/`
//! 4. Render one detail page per entry into `images/image_<n>.html`
//! 5. Render the index pages (`index.html`, `page1.html`, …)
//! 6. Copy the style's resources into `resources/`
//!
//! ## Output Structure
//!
//! ```text
//! <local_dir>/<who>/<album>/
//! ├── index.html                 # Index page 0
//! ├── page1.html                 # Further index pages
//! ├── images/
//! │   ├── image_1.html           # Detail pages
//! │   ├── 01-beach.jpg           # Display variant (same name as the source)
//! │   └── notes.pdf              # Copied original (movies, documents)
//! ├── thumbs/
//! │   └── 01-beach.jpg           # Thumbnail
//! └── resources/                 # Style assets
//! ```
//!
//! The first failure aborts the run. Files written before it stay on disk.

use crate::classify::{self, ClassifyError, SuffixTable};
use crate::config::{AlbumConfig, ConfigError};
use crate::imaging::{BackendError, ImageBackend, RustBackend, VariantSpec, create_variants};
use crate::layout::{self, Layout, LayoutError};
use crate::naming::{self, IMAGES_DIR, THUMBS_DIR};
use crate::render::{self, PageRenderer, PageSettings, RenderError, ResourceSource, Style};
use crate::resources::{self, ResourceError};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("Resource copy failed: {0}")]
    Resource(#[from] ResourceError),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GenerateError + '_ {
    move |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// One generation invocation: where to read, where to write, what to call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumRun {
    pub input_dir: PathBuf,
    /// Recipient, as given on the command line.
    pub who: String,
    pub title: String,
    /// Input directory name, lower-cased with spaces removed.
    pub album_dir_name: String,
    /// `<local_dir>/<who>/<album_dir_name>`
    pub output_dir: PathBuf,
}

impl AlbumRun {
    /// Derive a run from the config and the command-line arguments.
    ///
    /// The title defaults to the input directory's own name.
    pub fn new(
        config: &AlbumConfig,
        who: &str,
        input_dir: &Path,
        title: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let who = who.trim();
        if who.is_empty() {
            return Err(ConfigError::Validation("recipient must not be empty".into()));
        }
        if !config.knows_recipient(who) {
            tracing::warn!(who, "Recipient is not listed in the config");
        }

        let album_dir_name = naming::album_dir_name(input_dir).ok_or_else(|| {
            ConfigError::Validation(format!(
                "cannot derive an album name from {}",
                input_dir.display()
            ))
        })?;
        let title = match title {
            Some(t) => t.to_string(),
            None => input_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| album_dir_name.clone()),
        };

        Ok(Self {
            input_dir: input_dir.to_path_buf(),
            who: who.to_string(),
            title,
            output_dir: config.output_root().join(who).join(&album_dir_name),
            album_dir_name,
        })
    }

    /// Path of the generated root document.
    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(naming::ROOT_DOCUMENT)
    }

    fn page_settings(&self, config: &AlbumConfig) -> PageSettings {
        PageSettings {
            title: self.title.clone(),
            who: naming::capitalize(&self.who),
            thumbnail_box: config.thumbnail_box(),
            default_height: config.display_box().1,
        }
    }
}

/// What a generation pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub layout: Layout,
    pub resources_copied: usize,
}

/// Classify the input and compute the layout without writing anything.
pub fn plan(run: &AlbumRun, config: &AlbumConfig) -> Result<Layout, GenerateError> {
    let table = SuffixTable::from_config(&config.suffixes);
    let files = classify::classify(&run.input_dir, &table)?;
    Ok(layout::build_layout(files, config.per_page)?)
}

/// Generate an album with the configured style and the pure Rust backend.
pub fn generate(run: &AlbumRun, config: &AlbumConfig) -> Result<GenerateResult, GenerateError> {
    let style = Style::load(&config.style, config.styles_root().as_deref())?;
    tracing::info!(style = style.name(), "Using style");
    generate_with(run, config, &RustBackend::new(), &style, style.resources())
}

/// Generate an album with a specific backend and renderer (allows testing
/// with mocks).
pub fn generate_with(
    run: &AlbumRun,
    config: &AlbumConfig,
    backend: &impl ImageBackend,
    renderer: &impl PageRenderer,
    resources: &ResourceSource,
) -> Result<GenerateResult, GenerateError> {
    let mut layout = plan(run, config)?;

    let images_dir = run.output_dir.join(IMAGES_DIR);
    let thumbs_dir = run.output_dir.join(THUMBS_DIR);
    for dir in [&run.output_dir, &images_dir, &thumbs_dir] {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
    }

    write_variants(&mut layout, backend, &images_dir, &thumbs_dir, config)?;
    copy_originals(&layout, &images_dir)?;

    let settings = run.page_settings(config);
    write_detail_pages(&layout, renderer, &settings, &run.output_dir)?;
    write_index_pages(&layout, renderer, &settings, &run.output_dir)?;

    let resources_copied = resources::copy_resources(resources, &run.output_dir)?;

    tracing::info!(
        entries = layout.entries.len(),
        pages = layout.pages.len(),
        output = %run.output_dir.display(),
        "Album generated"
    );
    Ok(GenerateResult {
        output_dir: run.output_dir.clone(),
        index_path: run.index_path(),
        layout,
        resources_copied,
    })
}

/// Create both variants for every photo and record their dimensions.
///
/// Entries are processed in parallel; results keep sequence order and the
/// first decode or encode failure aborts the pass.
fn write_variants(
    layout: &mut Layout,
    backend: &impl ImageBackend,
    images_dir: &Path,
    thumbs_dir: &Path,
    config: &AlbumConfig,
) -> Result<(), GenerateError> {
    let spec = VariantSpec::from_config(config);
    let variants = layout
        .entries
        .par_iter()
        .map(|entry| {
            if entry.kind.is_image() {
                create_variants(backend, &entry.source_path, thumbs_dir, images_dir, &spec)
                    .map(Some)
            } else {
                Ok(None)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (entry, variants) in layout.entries.iter_mut().zip(variants) {
        entry.variants = variants;
    }
    Ok(())
}

fn copy_originals(layout: &Layout, images_dir: &Path) -> Result<(), GenerateError> {
    for entry in layout.entries.iter().filter(|e| !e.kind.is_image()) {
        let dest = images_dir.join(&entry.file_name);
        fs::copy(&entry.source_path, &dest).map_err(io_error(&entry.source_path))?;
        tracing::info!(file = %entry.file_name, kind = %entry.kind, "Copied original");
    }
    Ok(())
}

fn write_detail_pages(
    layout: &Layout,
    renderer: &impl PageRenderer,
    settings: &PageSettings,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    let total = layout.entries.len();
    for entry in &layout.entries {
        let html = renderer.render_detail(&render::detail_context(entry, total, settings))?;
        let path = output_dir.join(render::detail_page_path(entry));
        fs::write(&path, html).map_err(io_error(&path))?;
    }
    if total > 0 {
        tracing::info!(count = total, "Wrote detail pages");
    }
    Ok(())
}

fn write_index_pages(
    layout: &Layout,
    renderer: &impl PageRenderer,
    settings: &PageSettings,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    for page in &layout.pages {
        let html = renderer.render_index(&render::index_context(layout, page, settings))?;
        let path = output_dir.join(&page.file_name);
        fs::write(&path, html).map_err(io_error(&path))?;
        tracing::info!(page = %page.file_name, entries = page.len(), "Wrote index page");
    }
    Ok(())
}
