//! Command-line interface module for mediatidy.
//!
//! This module handles:
//! - Flag parsing
//! - Configuration loading and settings resolution
//! - Organization orchestration and the closing summary

use crate::config::{DEFAULT_CONFIG_FILE, MediaConfig, Overrides, Settings};
use crate::logging::Verbosity;
use crate::organizer::{Organizer, RunReport};
use crate::output::OutputFormatter;
use crate::sink::{EventSink, TracingSink};
use clap::{Parser, ValueHint};
use std::path::PathBuf;

/// Sort media files into extension and name-prefix subfolders.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Organize image and video files into subfolders without overwriting anything"
)]
pub struct Args {
    /// Directory to scan for files
    #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Folder to move fixed-extension (.png) files into
    #[arg(long, value_name = "NAME")]
    pub ext: Option<String>,

    /// Path to the TOML configuration file (created with defaults if missing)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 2 if any file could not be organized
    #[arg(long)]
    pub strict: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The configuration file to use, `--config` or the default in the cwd.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            dir: self.dir.clone(),
            ext: self.ext.clone(),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Runs the CLI application with parsed arguments.
///
/// Loads (and, outside dry runs, creates) the configuration file, resolves
/// the settings and organizes the target directory, logging through
/// `tracing`.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use mediatidy::cli::{Args, run_cli};
///
/// let args = Args::parse_from(["mediatidy", "--dir", "/path/to/photos"]);
/// match run_cli(&args) {
///     Ok(report) => println!("{} files processed", report.total_processed()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &Args) -> Result<RunReport, String> {
    let config_path = args.config_path();
    let config = if args.dry_run && !config_path.exists() {
        tracing::debug!(
            "Dry run: not creating {}, using defaults",
            config_path.display()
        );
        MediaConfig::defaults()
    } else {
        MediaConfig::load_or_create(&config_path)
    };

    let settings = Settings::resolve(&args.overrides(), &config);
    run_with_settings(&settings, args.dry_run, &TracingSink)
}

/// Organizes the directory described by `settings` and prints the summary.
///
/// # Errors
///
/// Returns a message if the target directory cannot be read. Per-file
/// failures are reported to `sink` and counted in the report instead.
pub fn run_with_settings(
    settings: &Settings,
    dry_run: bool,
    sink: &dyn EventSink,
) -> Result<RunReport, String> {
    tracing::info!("Target directory: {}", settings.target_dir.display());
    tracing::info!(
        ".{} destination subfolder: {}",
        settings.fixed_extension,
        settings.ext_folder
    );
    if dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            settings.target_dir.display()
        ));
    }

    let rules = settings.rules();
    let report = Organizer::new(&settings.target_dir, &rules, sink)
        .dry_run(dry_run)
        .run()
        .map_err(|e| e.to_string())?;

    OutputFormatter::summary_table(&report);
    Ok(report)
}
