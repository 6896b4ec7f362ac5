//! Album configuration module.
//!
//! Handles loading and validating the `config.toml` that drives every run.
//! The configuration is an explicit value: it is loaded once by the caller
//! and threaded through [`AlbumRun`](crate::generate::AlbumRun) and the sync
//! step. Nothing reads it from global state.
//!
//! ## Config File Location
//!
//! ```text
//! ~/.amaker/
//! ├── config.toml          # Loaded when --config is not given
//! └── styles/              # Optional on-disk styles (see `styles_dir`)
//!     └── default/
//!         ├── index.tmpl
//!         ├── image.tmpl
//!         └── resources/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! local_dir = "~/albums"        # Base directory for generated albums
//! who = ["noname"]              # Known recipients
//! per_page = 12                 # Entries per index page
//! style = "default"             # Template set
//!
//! [suffixes]
//! image = [".jpg"]
//! movie = [".mov", ".mp4"]
//! document = [".pdf"]
//!
//! [thumbnails]
//! size = [240, 240]             # Bounding box (width, height)
//!
//! [images]
//! size = [500, 500]             # Display-size bounding box
//! quality = 90                  # Lossy encoding quality (1-100)
//!
//! [target]
//! server = "example.org"
//! port = 22
//! directory = "/var/www/albums"
//! username = "album"
//! password = "secret"
//! url = "https://example.org"
//! timeout_secs = 30
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Album configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumConfig {
    /// Base directory under which `<who>/<album>` output trees are created.
    pub local_dir: PathBuf,
    /// Known recipients.
    pub who: Vec<String>,
    /// Entries per index page.
    pub per_page: usize,
    /// Name of the active style (template set).
    pub style: String,
    /// Directory holding on-disk styles. Defaults to `~/.amaker/styles`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles_dir: Option<PathBuf>,
    /// Suffix tables used by the classifier.
    pub suffixes: SuffixConfig,
    /// Thumbnail variant settings.
    pub thumbnails: ThumbnailsConfig,
    /// Display-size variant settings.
    pub images: ImagesConfig,
    /// Remote publish target.
    pub target: TargetConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            local_dir: default_local_dir(),
            who: vec!["noname".to_string()],
            per_page: 12,
            style: "default".to_string(),
            styles_dir: None,
            suffixes: SuffixConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            images: ImagesConfig::default(),
            target: TargetConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn default_local_dir() -> PathBuf {
    home_dir()
        .map(|home| home.join("albums"))
        .unwrap_or_else(|| PathBuf::from("albums"))
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// `~/.amaker/config.toml`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".amaker").join("config.toml"))
}

impl AlbumConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::Validation(
                "per_page must be at least 1".into(),
            ));
        }
        if self.thumbnails.size.contains(&0) {
            return Err(ConfigError::Validation(
                "thumbnails.size values must be non-zero".into(),
            ));
        }
        if self.images.size.contains(&0) {
            return Err(ConfigError::Validation(
                "images.size values must be non-zero".into(),
            ));
        }
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.style.trim().is_empty() {
            return Err(ConfigError::Validation("style must not be empty".into()));
        }
        if self.suffixes.image.is_empty() {
            return Err(ConfigError::Validation(
                "suffixes.image must not be empty".into(),
            ));
        }
        self.suffixes.check_disjoint()?;
        Ok(())
    }

    /// Thumbnail bounding box as `(width, height)`.
    pub fn thumbnail_box(&self) -> (u32, u32) {
        (self.thumbnails.size[0], self.thumbnails.size[1])
    }

    /// Display-size bounding box as `(width, height)`.
    pub fn display_box(&self) -> (u32, u32) {
        (self.images.size[0], self.images.size[1])
    }

    /// `local_dir` with a leading `~` replaced by the home directory.
    pub fn output_root(&self) -> PathBuf {
        expand_home(&self.local_dir)
    }

    /// Directory searched for on-disk styles.
    pub fn styles_root(&self) -> Option<PathBuf> {
        self.styles_dir
            .as_deref()
            .map(expand_home)
            .or_else(|| home_dir().map(|home| home.join(".amaker").join("styles")))
    }

    /// Whether `who` is one of the configured recipients (case-insensitive).
    pub fn knows_recipient(&self, who: &str) -> bool {
        self.who.iter().any(|w| w.eq_ignore_ascii_case(who))
    }
}

/// Suffix tables for the classifier.
///
/// Entries may be written with or without the leading dot and in any case;
/// [`normalize_suffix`] brings them to `.ext` lower-case form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuffixConfig {
    pub image: Vec<String>,
    pub movie: Vec<String>,
    pub document: Vec<String>,
}

impl Default for SuffixConfig {
    fn default() -> Self {
        Self {
            image: vec![".jpg".to_string()],
            movie: vec![".mov".to_string(), ".mp4".to_string()],
            document: vec![".pdf".to_string()],
        }
    }
}

impl SuffixConfig {
    fn check_disjoint(&self) -> Result<(), ConfigError> {
        let tables = [
            ("image", &self.image),
            ("movie", &self.movie),
            ("document", &self.document),
        ];
        let mut seen: Vec<(String, &str)> = Vec::new();
        for (kind, suffixes) in tables {
            for suffix in suffixes.iter().map(|s| normalize_suffix(s)) {
                if suffix == "." {
                    return Err(ConfigError::Validation(format!(
                        "suffixes.{kind} contains an empty suffix"
                    )));
                }
                if let Some((_, other)) = seen.iter().find(|(s, _)| *s == suffix) {
                    return Err(ConfigError::Validation(format!(
                        "suffix {suffix} is listed under both suffixes.{other} and suffixes.{kind}"
                    )));
                }
                seen.push((suffix, kind));
            }
        }
        Ok(())
    }
}

/// Lower-case a suffix and make sure it carries a leading dot.
pub fn normalize_suffix(suffix: &str) -> String {
    let lower = suffix.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Thumbnail variant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Bounding box as `[width, height]`.
    pub size: [u32; 2],
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { size: [240, 240] }
    }
}

/// Display-size variant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Bounding box as `[width, height]`. Its height doubles as the layout
    /// height for movie and document entries.
    pub size: [u32; 2],
    /// Encoding quality for lossy formats (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            size: [500, 500],
            quality: 90,
        }
    }
}

/// Remote publish target as written in the config file.
///
/// Every key except `port` and `timeout_secs` may be absent; the sync step
/// calls [`TargetConfig::resolve`] before opening a connection.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub server: Option<String>,
    pub port: u16,
    pub directory: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: 22,
            directory: None,
            username: None,
            password: None,
            url: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("directory", &self.directory)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("url", &self.url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TargetConfig {
    /// Check that every key needed for a sync is present.
    pub fn resolve(&self) -> Result<SyncTarget, ConfigError> {
        fn required(value: &Option<String>, key: &str) -> Result<String, ConfigError> {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .ok_or_else(|| ConfigError::Validation(format!("target.{key} is not set")))
        }

        Ok(SyncTarget {
            server: required(&self.server, "server")?,
            port: self.port,
            directory: required(&self.directory, "directory")?,
            username: required(&self.username, "username")?,
            password: required(&self.password, "password")?,
            url: required(&self.url, "url")?,
            timeout_secs: self.timeout_secs,
        })
    }
}

/// A fully specified remote target.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub server: String,
    pub port: u16,
    pub directory: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncTarget")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("directory", &self.directory)
            .field("username", &self.username)
            .field("password", &"***")
            .field("url", &self.url)
            .finish()
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading
// =============================================================================

/// Parse and validate config TOML text.
pub fn parse_config(content: &str) -> Result<AlbumConfig, ConfigError> {
    let config: AlbumConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file, or from `~/.amaker/config.toml`.
///
/// An explicit path must exist. The default location is optional: when it is
/// missing, stock defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<AlbumConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                let config = AlbumConfig::default();
                config.validate()?;
                return Ok(config);
            }
        },
    };
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Album Maker Configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Base directory for generated albums. Output lands in
# <local_dir>/<who>/<album directory name>/.
# local_dir = "~/albums"

# Known recipients.
who = ["noname"]

# Entries per index page.
per_page = 12

# Template set. "default" is built in; other names are looked up in styles_dir.
style = "default"

# Directory holding on-disk styles (<styles_dir>/<style>/index.tmpl, image.tmpl,
# resources/). Defaults to ~/.amaker/styles.
# styles_dir = "/path/to/styles"

# ---------------------------------------------------------------------------
# File classification (case-insensitive, leading dot optional)
# ---------------------------------------------------------------------------
[suffixes]
image = [".jpg"]
movie = [".mov", ".mp4"]
document = [".pdf"]

# ---------------------------------------------------------------------------
# Image variants (fit within the box, never upscaled)
# ---------------------------------------------------------------------------
[thumbnails]
size = [240, 240]

[images]
size = [500, 500]
# Encoding quality for lossy formats (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Publish target (SFTP)
# ---------------------------------------------------------------------------
[target]
# server = "example.org"
port = 22
# directory = "/var/www/albums"
# username = "album"
# password = "secret"
# url = "https://example.org"
timeout_secs = 30

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_stock_values() {
        let config = AlbumConfig::default();
        assert_eq!(config.per_page, 12);
        assert_eq!(config.style, "default");
        assert_eq!(config.who, vec!["noname"]);
        assert_eq!(config.thumbnail_box(), (240, 240));
        assert_eq!(config.display_box(), (500, 500));
        assert_eq!(config.images.quality, 90);
        assert_eq!(config.target.port, 22);
        assert!(config.target.server.is_none());
        assert!(config.local_dir.ends_with("albums"));
    }

    #[test]
    fn default_config_is_valid() {
        AlbumConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
per_page = 6

[thumbnails]
size = [120, 90]
"#,
        )
        .unwrap();
        assert_eq!(config.per_page, 6);
        assert_eq!(config.thumbnail_box(), (120, 90));
        // Untouched sections keep their defaults
        assert_eq!(config.display_box(), (500, 500));
        assert_eq!(config.suffixes.movie, vec![".mov", ".mp4"]);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = parse_config("per_pgae = 6\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_per_page_rejected() {
        let result = parse_config("per_page = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_thumbnail_size_rejected() {
        let result = parse_config("[thumbnails]\nsize = [0, 240]\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn out_of_range_quality_rejected() {
        let result = parse_config("[images]\nquality = 101\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn suffix_claimed_twice_rejected() {
        let result = parse_config(
            r#"
[suffixes]
image = [".jpg"]
document = ["JPG"]
"#,
        );
        match result {
            Err(ConfigError::Validation(msg)) => {
                assert!(msg.contains(".jpg"), "unexpected message: {msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn normalize_suffix_adds_dot_and_lowercases() {
        assert_eq!(normalize_suffix("JPG"), ".jpg");
        assert_eq!(normalize_suffix(".Mp4"), ".mp4");
        assert_eq!(normalize_suffix(" .pdf "), ".pdf");
    }

    #[test]
    fn target_resolve_names_first_missing_key() {
        let target = TargetConfig {
            server: Some("example.org".into()),
            ..TargetConfig::default()
        };
        match target.resolve() {
            Err(ConfigError::Validation(msg)) => assert_eq!(msg, "target.directory is not set"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn target_resolve_complete() {
        let target = TargetConfig {
            server: Some("example.org".into()),
            port: 2222,
            directory: Some("/srv/albums".into()),
            username: Some("album".into()),
            password: Some("secret".into()),
            url: Some("https://example.org".into()),
            timeout_secs: 5,
        };
        let resolved = target.resolve().unwrap();
        assert_eq!(resolved.port, 2222);
        assert_eq!(resolved.directory, "/srv/albums");
        assert_eq!(resolved.timeout_secs, 5);
    }

    #[test]
    fn debug_output_hides_password() {
        let target = TargetConfig {
            password: Some("hunter2".into()),
            ..TargetConfig::default()
        };
        let debug = format!("{target:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn knows_recipient_ignores_case() {
        let config = AlbumConfig {
            who: vec!["Alice".into(), "bob".into()],
            ..AlbumConfig::default()
        };
        assert!(config.knows_recipient("alice"));
        assert!(config.knows_recipient("BOB"));
        assert!(!config.knows_recipient("carol"));
    }

    #[test]
    fn output_root_expands_home() {
        let config = AlbumConfig {
            local_dir: PathBuf::from("/srv/albums"),
            ..AlbumConfig::default()
        };
        assert_eq!(config.output_root(), PathBuf::from("/srv/albums"));

        let tilde = AlbumConfig {
            local_dir: PathBuf::from("~/albums"),
            ..AlbumConfig::default()
        };
        if let Some(home) = home_dir() {
            assert_eq!(tilde.output_root(), home.join("albums"));
        }
    }

    #[test]
    fn effective_threads_never_exceeds_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        let defaults = AlbumConfig::default();
        assert_eq!(config.per_page, defaults.per_page);
        assert_eq!(config.suffixes.image, defaults.suffixes.image);
        assert_eq!(config.thumbnail_box(), defaults.thumbnail_box());
    }

    #[test]
    fn load_config_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.toml");
        fs::write(&path, "style = \"dark\"\nwho = [\"alice\"]\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.style, "dark");
        assert_eq!(config.who, vec!["alice"]);
    }

    #[test]
    fn load_config_missing_explicit_file_errors() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
