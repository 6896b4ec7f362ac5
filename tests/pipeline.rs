//! End-to-end tests: real JPEGs in, album tree out, published to a
//! directory-backed remote.

use album_maker::config::{AlbumConfig, SyncTarget};
use album_maker::generate::{self, AlbumRun, GenerateError};
use album_maker::imaging::BackendError;
use album_maker::sync::{self, Probe, RemoteFs, SyncError};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    let file = fs::File::create(path).unwrap();
    JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

struct Workspace {
    tmp: TempDir,
    config: AlbumConfig,
}

impl Workspace {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let config = AlbumConfig {
            local_dir: tmp.path().join("albums"),
            styles_dir: Some(tmp.path().join("styles")),
            ..AlbumConfig::default()
        };
        Self { tmp, config }
    }

    fn input(&self, name: &str) -> PathBuf {
        let dir = self.tmp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn run(&self, input: &Path) -> AlbumRun {
        AlbumRun::new(&self.config, "alice", input, None).unwrap()
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn twenty_five_photos_make_three_pages() {
    let ws = Workspace::new();
    let input = ws.input("Summer Trip");
    for i in 1..=25 {
        write_jpeg(&input.join(format!("img{i:02}.jpg")), 64, 48);
    }
    let run = ws.run(&input);

    let result = generate::generate(&run, &ws.config).unwrap();

    let out = ws.tmp.path().join("albums/alice/summertrip");
    assert_eq!(result.output_dir, out);
    assert_eq!(result.index_path, out.join("index.html"));
    assert_eq!(result.layout.pages.len(), 3);

    let index = read(out.join("index.html"));
    assert!(index.contains("<title>Summer Trip</title>"));
    assert!(index.contains(r#"data-next="page1.html""#));
    assert!(!index.contains("data-prev"));

    let last = read(out.join("page2.html"));
    assert!(last.contains(r#"data-prev="page1.html""#));
    assert!(!last.contains("data-next"));
    assert!(last.contains(r#"href="images/image_25.html""#));
    assert!(!out.join("page3.html").exists());

    let detail = read(out.join("images/image_13.html"));
    assert!(detail.contains(r#"data-prev="image_12.html""#));
    assert!(detail.contains(r#"data-next="image_14.html""#));
    assert!(detail.contains(r#"href="../page1.html""#));

    assert!(out.join("thumbs/img25.jpg").exists());
    assert!(out.join("images/img25.jpg").exists());
    assert!(out.join("resources/style.css").exists());
    assert!(out.join("resources/nav.js").exists());
}

#[test]
fn variants_fit_their_boxes() {
    let ws = Workspace::new();
    let input = ws.input("wide");
    write_jpeg(&input.join("pano.jpg"), 800, 400);
    write_jpeg(&input.join("small.jpg"), 100, 80);
    let run = ws.run(&input);

    generate::generate(&run, &ws.config).unwrap();

    let dims = |rel: &str| image::image_dimensions(run.output_dir.join(rel)).unwrap();
    assert_eq!(dims("thumbs/pano.jpg"), (240, 120));
    assert_eq!(dims("images/pano.jpg"), (500, 250));
    assert_eq!(dims("thumbs/small.jpg"), (100, 80));
    assert_eq!(dims("images/small.jpg"), (100, 80));

    let index = read(run.output_dir.join("index.html"));
    assert!(index.contains(r#"src="thumbs/pano.jpg" width="240" height="120""#));
}

#[test]
fn empty_input_still_gets_index_and_resources() {
    let ws = Workspace::new();
    let input = ws.input("nothing");
    fs::write(input.join("readme.txt"), "not media").unwrap();
    let run = ws.run(&input);

    let result = generate::generate(&run, &ws.config).unwrap();

    assert!(result.layout.entries.is_empty());
    assert!(run.output_dir.join("index.html").exists());
    assert!(!run.output_dir.join("page1.html").exists());
    assert!(!run.output_dir.join("images/image_1.html").exists());
    assert!(run.output_dir.join("resources/style.css").exists());
}

#[test]
fn document_links_to_copied_original() {
    let ws = Workspace::new();
    let input = ws.input("mixed");
    for name in ["a.jpg", "b.jpg", "d.jpg", "e.jpg", "f.jpg"] {
        write_jpeg(&input.join(name), 32, 32);
    }
    fs::write(input.join("c.pdf"), b"%PDF-1.4").unwrap();
    let config = AlbumConfig {
        per_page: 10,
        ..ws.config.clone()
    };
    let run = AlbumRun::new(&config, "alice", &input, None).unwrap();

    generate::generate(&run, &config).unwrap();

    let out = &run.output_dir;
    assert_eq!(fs::read(out.join("images/c.pdf")).unwrap(), b"%PDF-1.4");
    assert!(!out.join("thumbs/c.pdf").exists());

    let index = read(out.join("index.html"));
    assert!(index.contains(r#"href="images/c.pdf""#));
    assert!(index.contains(r#"href="images/image_4.html""#));

    assert!(read(out.join("images/image_2.html")).contains(r#"data-next="image_3.html""#));
    assert!(read(out.join("images/image_4.html")).contains(r#"data-prev="image_3.html""#));
    assert!(read(out.join("images/image_3.html")).contains(r#"href="c.pdf""#));
}

#[test]
fn undecodable_photo_aborts_generation() {
    let ws = Workspace::new();
    let input = ws.input("broken");
    write_jpeg(&input.join("a.jpg"), 32, 32);
    fs::write(input.join("b.jpg"), b"not a jpeg at all").unwrap();
    let run = ws.run(&input);

    let result = generate::generate(&run, &ws.config);

    assert!(matches!(
        result,
        Err(GenerateError::Imaging(BackendError::Decode { .. }))
    ));
    assert!(!run.output_dir.join("index.html").exists());
}

#[test]
fn on_disk_style_replaces_builtin() {
    let ws = Workspace::new();
    let style_dir = ws.tmp.path().join("styles/plain");
    fs::create_dir_all(style_dir.join("resources")).unwrap();
    fs::write(
        style_dir.join("index.tmpl"),
        "{{ who }}:{% for e in entries %}[{{ e.link }}]{% endfor %}",
    )
    .unwrap();
    fs::write(style_dir.join("image.tmpl"), "{{ entry.img_number }}").unwrap();
    fs::write(style_dir.join("resources/plain.css"), "p{}").unwrap();

    let config = AlbumConfig {
        style: "plain".into(),
        ..ws.config.clone()
    };
    let input = ws.input("styled");
    write_jpeg(&input.join("a.jpg"), 16, 16);
    let run = AlbumRun::new(&config, "alice", &input, None).unwrap();

    generate::generate(&run, &config).unwrap();

    assert_eq!(read(run.output_dir.join("index.html")), "Alice:[images/image_1.html]");
    assert_eq!(read(run.output_dir.join("images/image_1.html")), "1");
    assert!(run.output_dir.join("resources/plain.css").exists());
    assert!(!run.output_dir.join("resources/style.css").exists());
}

#[test]
fn plan_matches_generated_names() {
    let ws = Workspace::new();
    let input = ws.input("planned");
    for name in ["b.jpg", "a.jpg", "c.mp4"] {
        write_jpeg(&input.join(name), 16, 16);
    }
    let run = ws.run(&input);

    let layout = generate::plan(&run, &ws.config).unwrap();
    assert!(!run.output_dir.exists());

    let names: Vec<_> = layout.entries.iter().map(|e| e.file_name.as_str()).collect();
    assert_eq!(names, ["a.jpg", "b.jpg", "c.mp4"]);

    generate::generate(&run, &ws.config).unwrap();
    for entry in &layout.entries {
        assert!(run.output_dir.join("images").join(&entry.detail_file_name).exists());
    }
}

/// A remote whose paths live under a local directory.
struct DirRemote {
    root: PathBuf,
    mkdirs: Vec<String>,
    puts: Vec<String>,
}

impl DirRemote {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            mkdirs: Vec::new(),
            puts: Vec::new(),
        }
    }

    fn local(&self, remote: &str) -> PathBuf {
        self.root.join(remote.trim_start_matches('/'))
    }
}

impl RemoteFs for DirRemote {
    fn stat(&mut self, path: &str) -> Result<Probe, SyncError> {
        Ok(if self.local(path).exists() {
            Probe::Exists
        } else {
            Probe::Absent
        })
    }

    fn mkdir(&mut self, path: &str) -> Result<(), SyncError> {
        self.mkdirs.push(path.to_string());
        fs::create_dir(self.local(path)).map_err(|e| SyncError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn put(&mut self, local: &Path, remote: &str) -> Result<(), SyncError> {
        self.puts.push(remote.to_string());
        fs::copy(local, self.local(remote)).map_err(|e| SyncError::Transport {
            path: remote.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn target() -> SyncTarget {
    SyncTarget {
        server: "localhost".into(),
        port: 22,
        directory: "/www".into(),
        username: "album".into(),
        password: "secret".into(),
        url: "https://photos.example".into(),
        timeout_secs: 5,
    }
}

#[test]
fn publish_mirrors_tree_and_rerun_is_idempotent() {
    let ws = Workspace::new();
    let input = ws.input("Road Trip");
    write_jpeg(&input.join("a.jpg"), 64, 64);
    fs::write(input.join("b.pdf"), b"%PDF").unwrap();
    let run = ws.run(&input);
    generate::generate(&run, &ws.config).unwrap();

    let remote_root = ws.tmp.path().join("remote");
    fs::create_dir_all(remote_root.join("www")).unwrap();
    let mut remote = DirRemote::new(remote_root.clone());

    let first = sync::sync_with(&mut remote, &target(), &run).unwrap();

    assert_eq!(
        first.url,
        "https://photos.example/www/alice/roadtrip/index.html"
    );
    let mirrored = remote_root.join("www/alice/roadtrip");
    for rel in [
        "index.html",
        "images/image_1.html",
        "images/image_2.html",
        "images/a.jpg",
        "images/b.pdf",
        "thumbs/a.jpg",
        "resources/style.css",
    ] {
        assert!(mirrored.join(rel).exists(), "{rel} not uploaded");
    }
    assert_eq!(remote.mkdirs.len(), 5);

    remote.mkdirs.clear();
    remote.puts.clear();
    let second = sync::sync_with(&mut remote, &target(), &run).unwrap();

    assert!(remote.mkdirs.is_empty());
    assert_eq!(second.url, first.url);
    assert_eq!(remote.puts.len(), first.stats.files_uploaded);
}

#[test]
fn upload_before_generate_is_refused() {
    let ws = Workspace::new();
    let input = ws.input("later");
    let run = ws.run(&input);
    let mut remote = DirRemote::new(ws.tmp.path().join("remote"));

    let result = sync::sync_with(&mut remote, &target(), &run);

    assert!(matches!(result, Err(SyncError::MissingLocal(_))));
    assert!(remote.puts.is_empty());
}
