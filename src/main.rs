use album_maker::generate::{self, AlbumRun};
use album_maker::{config, output, sync};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "album-maker")]
#[command(about = "Build a paginated photo album for one recipient and publish it")]
#[command(long_about = "\
Build a paginated photo album for one recipient and publish it

Every file directly inside the input directory whose suffix is configured as
an image, movie or document becomes one entry, in file name order. Photos get
a thumbnail and a display-size copy; movies and documents are copied as-is.

Output:

  <local_dir>/<who>/<album>/
  ├── index.html, page1.html, …   # Index pages (per_page entries each)
  ├── images/                     # Detail pages, display copies, originals
  ├── thumbs/                     # Thumbnails
  └── resources/                  # Style assets

<album> is the input directory name, lower-cased, with spaces removed.

Configuration is read from ~/.amaker/config.toml (or --config). Run
'album-maker gen-config' to print a documented config file.

Log verbosity follows RUST_LOG (default: info).")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.amaker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Recipient and input directory shared by the album commands.
#[derive(clap::Args, Clone)]
struct AlbumArgs {
    /// Recipient the album is made for
    who: String,
    /// Directory holding the photos, movies and documents
    input_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the album locally
    Generate {
        #[command(flatten)]
        album: AlbumArgs,
        /// Album title (default: the input directory name)
        #[arg(long)]
        title: Option<String>,
    },
    /// Upload a previously generated album
    Upload {
        #[command(flatten)]
        album: AlbumArgs,
    },
    /// Generate the album, then upload it
    Publish {
        #[command(flatten)]
        album: AlbumArgs,
        /// Album title (default: the input directory name)
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the computed pages and entries as JSON without writing anything
    Plan {
        #[command(flatten)]
        album: AlbumArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let album_config = config::load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Generate { album, title } => {
            let run = album_run(&album_config, album, title.as_deref())?;
            init_thread_pool(&album_config.processing);
            let result = generate::generate(&run, &album_config)?;
            output::print_generate_output(&result);
        }
        Command::Upload { album } => {
            let run = album_run(&album_config, album, None)?;
            let result = sync::sync(&album_config, &run)?;
            output::print_sync_output(&result);
        }
        Command::Publish { album, title } => {
            let run = album_run(&album_config, album, title.as_deref())?;
            // fail on an incomplete target before spending time on images
            album_config.target.resolve()?;
            init_thread_pool(&album_config.processing);
            let generated = generate::generate(&run, &album_config)?;
            output::print_generate_output(&generated);
            let synced = sync::sync(&album_config, &run)?;
            output::print_sync_output(&synced);
        }
        Command::Plan { album } => {
            let run = album_run(&album_config, album, None)?;
            let layout = generate::plan(&run, &album_config)?;
            println!("{}", output::format_plan_output(&layout)?);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn album_run(
    album_config: &config::AlbumConfig,
    args: &AlbumArgs,
    title: Option<&str>,
) -> Result<AlbumRun, config::ConfigError> {
    AlbumRun::new(album_config, &args.who, &absolute(&args.input_dir), title)
}

/// Resolve `.`, `..` and other relative inputs so the album name comes from
/// the real directory name.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Log to stderr so stdout carries only command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the config can lower it, never raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
