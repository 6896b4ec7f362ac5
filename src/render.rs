//! Index and detail page rendering.
//!
//! Templates come from a *style*: a named directory with two Tera templates
//! and a folder of static assets.
//!
//! ```text
//! <styles_dir>/<style>/
//! ├── index.tmpl        # one per index page
//! ├── image.tmpl        # one per entry (detail page)
//! └── resources/        # copied to <album>/resources/
//! ```
//!
//! The `default` style is compiled into the binary and used whenever no
//! on-disk directory of that name exists. Templates only present data: every
//! link and every number they print is computed here or in
//! [`layout`](crate::layout) and handed over through [`IndexContext`] and
//! [`DetailContext`]. Output is HTML-escaped.

use crate::layout::{Entry, Layout, Page};
use crate::naming::IMAGES_DIR;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

pub const INDEX_TEMPLATE: &str = "index.tmpl";
pub const DETAIL_TEMPLATE: &str = "image.tmpl";
pub const BUILTIN_STYLE: &str = "default";

const BUILTIN_INDEX: &str = include_str!("../styles/default/index.tmpl");
const BUILTIN_DETAIL: &str = include_str!("../styles/default/image.tmpl");
const BUILTIN_RESOURCES: &[(&str, &[u8])] = &[
    (
        "style.css",
        include_bytes!("../styles/default/resources/style.css"),
    ),
    ("nav.js", include_bytes!("../styles/default/resources/nav.js")),
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Style '{name}' not found at {path}")]
    MissingStyle { name: String, path: PathBuf },
    #[error("Style '{style}' has no template {path}")]
    MissingTemplate { style: String, path: PathBuf },
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),
}

fn new_tera() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".tmpl"]);
    tera.set_escape_fn(escape_html);
    tera
}

/// HTML escaping for `.tmpl` output.
///
/// Tera's built-in `escape_html` also encodes `/` as `&#x2F;`, which mangles
/// every `href`/`src` the templates print. This one escapes the same
/// characters except `/`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turns page contexts into text.
pub trait PageRenderer {
    fn render_index(&self, ctx: &IndexContext) -> Result<String, RenderError>;
    fn render_detail(&self, ctx: &DetailContext) -> Result<String, RenderError>;
}

/// Where a style's static assets come from.
#[derive(Debug, Clone)]
pub enum ResourceSource {
    /// Every file directly inside this directory.
    Directory(PathBuf),
    /// Assets compiled into the binary, as `(file name, contents)`.
    Embedded(&'static [(&'static str, &'static [u8])]),
}

/// A loaded template set.
pub struct Style {
    name: String,
    tera: Tera,
    resources: ResourceSource,
}

impl Style {
    /// Resolve a style by name.
    ///
    /// Looks for `<styles_root>/<name>/` first. The built-in style answers for
    /// `default` when that directory does not exist.
    pub fn load(name: &str, styles_root: Option<&Path>) -> Result<Self, RenderError> {
        let dir = styles_root.map(|root| root.join(name));
        match dir {
            Some(dir) if dir.is_dir() => Self::from_dir(name, &dir),
            _ if name == BUILTIN_STYLE => Self::builtin(),
            dir => Err(RenderError::MissingStyle {
                name: name.to_string(),
                path: dir.unwrap_or_else(|| PathBuf::from(name)),
            }),
        }
    }

    /// Load a style from an on-disk directory.
    pub fn from_dir(name: &str, dir: &Path) -> Result<Self, RenderError> {
        let mut files = Vec::new();
        for template in [INDEX_TEMPLATE, DETAIL_TEMPLATE] {
            let path = dir.join(template);
            if !path.is_file() {
                return Err(RenderError::MissingTemplate {
                    style: name.to_string(),
                    path,
                });
            }
            files.push((path, Some(template)));
        }

        let mut tera = new_tera();
        tera.add_template_files(files)?;
        tracing::debug!(style = name, dir = %dir.display(), "Loaded style");

        Ok(Self {
            name: name.to_string(),
            tera,
            resources: ResourceSource::Directory(dir.join("resources")),
        })
    }

    /// The style compiled into the binary.
    pub fn builtin() -> Result<Self, RenderError> {
        let mut tera = new_tera();
        tera.add_raw_templates(vec![
            (INDEX_TEMPLATE, BUILTIN_INDEX),
            (DETAIL_TEMPLATE, BUILTIN_DETAIL),
        ])?;
        Ok(Self {
            name: BUILTIN_STYLE.to_string(),
            tera,
            resources: ResourceSource::Embedded(BUILTIN_RESOURCES),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resources(&self) -> &ResourceSource {
        &self.resources
    }

    fn render<T: Serialize>(&self, template: &str, value: &T) -> Result<String, RenderError> {
        let context = Context::from_serialize(value)?;
        Ok(self.tera.render(template, &context)?)
    }
}

impl PageRenderer for Style {
    fn render_index(&self, ctx: &IndexContext) -> Result<String, RenderError> {
        self.render(INDEX_TEMPLATE, ctx)
    }

    fn render_detail(&self, ctx: &DetailContext) -> Result<String, RenderError> {
        self.render(DETAIL_TEMPLATE, ctx)
    }
}

// ============================================================================
// Template contexts
// ============================================================================

/// Album-wide values every page needs.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub title: String,
    /// Recipient as shown on index pages.
    pub who: String,
    pub thumbnail_box: (u32, u32),
    /// Layout height for entries without a display variant.
    pub default_height: u32,
}

/// One entry as seen by the index template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub kind: String,
    pub img_number: usize,
    pub link: String,
    pub link_text: String,
    pub thumb: Option<String>,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub image_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexContext {
    pub title: String,
    pub who: String,
    pub entries: Vec<EntryView>,
    pub prev_page: Option<String>,
    pub next_page: Option<String>,
    pub page_number: usize,
    pub total_pages: usize,
    pub thumb_x: u32,
    pub thumb_y: u32,
}

/// One entry as seen by the detail template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub kind: String,
    pub img_number: usize,
    pub total_images: usize,
    pub title: String,
    /// File shown or linked, relative to the detail page.
    pub image_file: String,
    pub image_width: u32,
    pub image_height: u32,
    pub prev_image: Option<String>,
    pub next_image: Option<String>,
    pub index_page: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailContext {
    pub title: String,
    pub entry: DetailView,
}

pub fn entry_view(entry: &Entry, settings: &PageSettings) -> EntryView {
    let thumb = entry.variants.map(|v| v.thumbnail).unwrap_or_default();
    EntryView {
        kind: entry.kind.to_string(),
        img_number: entry.sequence_number,
        link: entry.link(),
        link_text: entry.file_name.clone(),
        thumb: entry.thumbnail_relative_path(),
        thumb_width: thumb.width,
        thumb_height: thumb.height,
        image_height: entry.layout_height(settings.default_height),
    }
}

pub fn index_context(layout: &Layout, page: &Page, settings: &PageSettings) -> IndexContext {
    IndexContext {
        title: settings.title.clone(),
        who: settings.who.clone(),
        entries: layout
            .page_entries(page)
            .iter()
            .map(|e| entry_view(e, settings))
            .collect(),
        prev_page: page.prev_file_name.clone(),
        next_page: page.next_file_name.clone(),
        page_number: page.page_number,
        total_pages: layout.pages.len(),
        thumb_x: settings.thumbnail_box.0,
        thumb_y: settings.thumbnail_box.1,
    }
}

pub fn detail_context(entry: &Entry, total: usize, settings: &PageSettings) -> DetailContext {
    let display = entry.variants.map(|v| v.display).unwrap_or_default();
    DetailContext {
        title: settings.title.clone(),
        entry: DetailView {
            kind: entry.kind.to_string(),
            img_number: entry.sequence_number,
            total_images: total,
            title: entry.file_name.clone(),
            image_file: entry.file_name.clone(),
            image_width: display.width,
            image_height: entry.layout_height(settings.default_height),
            prev_image: entry.prev_detail.clone(),
            next_image: entry.next_detail.clone(),
            index_page: entry.index_link.clone(),
        },
    }
}

/// Relative path of a detail page inside the album tree.
pub fn detail_page_path(entry: &Entry) -> String {
    format!("{IMAGES_DIR}/{}", entry.detail_file_name)
}
