//! Publishing a generated album to a remote server.
//!
//! The remote side only needs three operations (see [`RemoteFs`]): probe a
//! path, create a directory, write a file. Publishing mirrors the local album
//! tree onto `<directory>/<who>/<album>`:
//!
//! ```text
//! ensure  <directory>/<who>
//! ensure  <directory>/<who>/<album>
//! ensure  <directory>/<who>/<album>/{images,resources,thumbs}
//! put     index.html, page1.html, …          (root: *.html only)
//! put     images/*, resources/*, thumbs/*
//! ```
//!
//! "Ensure" probes first and only creates on a definite absence; any other
//! probe failure aborts. Puts overwrite. Nothing is ever listed, renamed or
//! deleted, so re-running a publish converges on the same remote tree.

use crate::config::{AlbumConfig, ConfigError, SyncTarget};
use crate::generate::AlbumRun;
use crate::naming::{self, MIRRORED_DIRS};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Nothing to publish: {0} does not exist (run generate first)")]
    MissingLocal(PathBuf),
    #[error("Could not connect to {server}: {message}")]
    Connect { server: String, message: String },
    #[error("Could not check remote path {path}: {message}")]
    ProbeFailed { path: String, message: String },
    #[error("Transfer failed at {path}: {message}")]
    Transport { path: String, message: String },
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Outcome of a metadata probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Exists,
    Absent,
}

/// What [`ensure_dir`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Existing,
    Created,
}

/// The remote file operations publishing relies on.
pub trait RemoteFs {
    /// Probe a path. A missing path is `Ok(Probe::Absent)`; only failures to
    /// find out are errors.
    fn stat(&mut self, path: &str) -> Result<Probe, SyncError>;

    fn mkdir(&mut self, path: &str) -> Result<(), SyncError>;

    /// Write a local file to `remote`, replacing any existing file.
    fn put(&mut self, local: &Path, remote: &str) -> Result<(), SyncError>;
}

/// Make sure a remote directory exists, creating it only when absent.
pub fn ensure_dir(fs: &mut impl RemoteFs, path: &str) -> Result<DirStatus, SyncError> {
    match fs.stat(path)? {
        Probe::Exists => Ok(DirStatus::Existing),
        Probe::Absent => {
            fs.mkdir(path)?;
            tracing::info!(path, "Created remote directory");
            Ok(DirStatus::Created)
        }
    }
}

/// Counts from one tree upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadStats {
    pub dirs_created: usize,
    pub files_uploaded: usize,
}

/// Mirror `local_root` onto `remote_album`.
///
/// `remote_album`'s parent must exist or be creatable in one step.
pub fn upload_tree(
    fs: &mut impl RemoteFs,
    local_root: &Path,
    remote_album: &str,
) -> Result<UploadStats, SyncError> {
    let mut stats = UploadStats::default();

    let mut dirs = vec![remote_album.to_string()];
    dirs.extend(MIRRORED_DIRS.iter().map(|dir| format!("{remote_album}/{dir}")));
    for dir in &dirs {
        if ensure_dir(fs, dir)? == DirStatus::Created {
            stats.dirs_created += 1;
        }
    }

    stats.files_uploaded += put_files(fs, local_root, remote_album, is_page)?;
    for dir in MIRRORED_DIRS {
        let local_dir = local_root.join(dir);
        if local_dir.is_dir() {
            stats.files_uploaded +=
                put_files(fs, &local_dir, &format!("{remote_album}/{dir}"), |_| true)?;
        }
    }
    Ok(stats)
}

/// Index pages are the only files published from the album root.
fn is_page(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}

/// Upload the regular files directly inside `local_dir` that pass `select`,
/// in name order.
fn put_files(
    fs: &mut impl RemoteFs,
    local_dir: &Path,
    remote_dir: &str,
    select: impl Fn(&Path) -> bool,
) -> Result<usize, SyncError> {
    let mut count = 0;
    for entry in WalkDir::new(local_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| SyncError::Walk {
            path: local_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !select(entry.path()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let remote = format!("{remote_dir}/{name}");
        fs.put(entry.path(), &remote)?;
        tracing::info!(file = %remote, "Uploaded");
        count += 1;
    }
    Ok(count)
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub remote_path: String,
    pub url: String,
    pub stats: UploadStats,
}

/// Publish a generated album over SFTP.
///
/// The target is validated and the local tree checked before any connection
/// is opened.
pub fn sync(config: &AlbumConfig, run: &AlbumRun) -> Result<SyncResult, SyncError> {
    let target = config.target.resolve()?;
    check_local(run)?;
    let mut session = SftpSession::connect(&target)?;
    sync_with(&mut session, &target, run)
}

/// Publish through any [`RemoteFs`] (allows testing with a fake).
pub fn sync_with(
    fs: &mut impl RemoteFs,
    target: &SyncTarget,
    run: &AlbumRun,
) -> Result<SyncResult, SyncError> {
    check_local(run)?;
    let recipient_dir = format!("{}/{}", target.directory.trim_end_matches('/'), run.who);
    let remote_path = naming::remote_album_path(&target.directory, &run.who, &run.album_dir_name);

    let mut stats = UploadStats::default();
    if ensure_dir(fs, &recipient_dir)? == DirStatus::Created {
        stats.dirs_created += 1;
    }
    let tree = upload_tree(fs, &run.output_dir, &remote_path)?;
    stats.dirs_created += tree.dirs_created;
    stats.files_uploaded += tree.files_uploaded;

    let url = naming::public_url(&target.url, &remote_path);
    tracing::info!(%url, files = stats.files_uploaded, "Published");
    Ok(SyncResult {
        remote_path,
        url,
        stats,
    })
}

fn check_local(run: &AlbumRun) -> Result<(), SyncError> {
    let index = run.index_path();
    if index.is_file() {
        Ok(())
    } else {
        Err(SyncError::MissingLocal(index))
    }
}

// ============================================================================
// SFTP transport
// ============================================================================

/// `LIBSSH2_FX_NO_SUCH_FILE`
const FX_NO_SUCH_FILE: i32 = 2;

/// An authenticated SFTP session.
pub struct SftpSession {
    sftp: ssh2::Sftp,
    // Keeps the transport alive for as long as `sftp` is in use.
    _session: ssh2::Session,
}

impl SftpSession {
    /// Connect, authenticate with the target's password and open SFTP.
    pub fn connect(target: &SyncTarget) -> Result<Self, SyncError> {
        let server = format!("{}:{}", target.server, target.port);
        let connect_error = |message: String| SyncError::Connect {
            server: server.clone(),
            message,
        };
        let timeout = Duration::from_secs(target.timeout_secs.max(1));

        let addrs = (target.server.as_str(), target.port)
            .to_socket_addrs()
            .map_err(|e| connect_error(e.to_string()))?;
        let mut last_error = None;
        let mut tcp = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    tcp = Some(stream);
                    break;
                }
                Err(e) => last_error = Some(e),
            }
        }
        let tcp = tcp.ok_or_else(|| {
            connect_error(
                last_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no address resolved".to_string()),
            )
        })?;

        let mut session = ssh2::Session::new().map_err(|e| connect_error(e.to_string()))?;
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| connect_error(e.to_string()))?;
        session
            .userauth_password(&target.username, &target.password)
            .map_err(|e| connect_error(format!("authentication failed: {e}")))?;
        let sftp = session.sftp().map_err(|e| connect_error(e.to_string()))?;

        tracing::info!(server = %server, user = %target.username, "Connected");
        Ok(Self {
            sftp,
            _session: session,
        })
    }
}

impl RemoteFs for SftpSession {
    fn stat(&mut self, path: &str) -> Result<Probe, SyncError> {
        match self.sftp.stat(Path::new(path)) {
            Ok(_) => Ok(Probe::Exists),
            Err(e) => match e.code() {
                ssh2::ErrorCode::SFTP(code) if code == FX_NO_SUCH_FILE => Ok(Probe::Absent),
                _ => Err(SyncError::ProbeFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }),
            },
        }
    }

    fn mkdir(&mut self, path: &str) -> Result<(), SyncError> {
        self.sftp
            .mkdir(Path::new(path), 0o755)
            .map_err(|e| SyncError::Transport {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    fn put(&mut self, local: &Path, remote: &str) -> Result<(), SyncError> {
        let transport_error = |message: String| SyncError::Transport {
            path: remote.to_string(),
            message,
        };
        let mut source = File::open(local).map_err(|source| SyncError::Io {
            path: local.to_path_buf(),
            source,
        })?;
        let mut dest = self
            .sftp
            .create(Path::new(remote))
            .map_err(|e| transport_error(e.to_string()))?;
        io::copy(&mut source, &mut dest).map_err(|e| transport_error(e.to_string()))?;
        Ok(())
    }
}
