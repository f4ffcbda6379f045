use clap::Parser;
use id3::Version;
use std::path::PathBuf;

use crate::metadata::{TagOptions, UpdateMode, Variant};

#[derive(Parser, Debug)]
#[command(name = "sampletag")]
#[command(version = "0.1.0")]
#[command(about = "Stamp ID3 metadata onto the bundled sample MP3s")]
pub struct Cli {
    /// Directory the sample paths are resolved against
    #[arg(long, short = 'b', default_value = ".")]
    pub base_dir: PathBuf,

    /// Field set to write: title/artist/album only, or everything
    #[arg(long, value_enum, default_value_t = Variant::Extended)]
    pub variant: Variant,

    /// Override the variant's update mode (extended replaces, minimal merges)
    #[arg(long, value_enum)]
    pub mode: Option<UpdateMode>,

    /// Write ID3v2.3 (UTF-16 text) instead of ID3v2.4 (UTF-8 text)
    #[arg(long = "id3v23", default_value_t = false)]
    pub id3v23: bool,

    /// Load and check every file, but write nothing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Append per-file failures to dated JSON logs under this directory
    #[arg(long)]
    pub error_log: Option<PathBuf>,

    /// Emit one JSON object per event instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Prefix text lines with [OK], [SKIP], [ERROR] and friends
    #[arg(long, default_value_t = false)]
    pub prefixed: bool,

    /// Only print warnings, errors and the final summary
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,

    /// Print resolved paths and the frames written for each file
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Console settings derived from CLI flags
#[derive(Clone, Debug)]
pub struct OutputConfig {
    pub prefixed: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: OutputFormat,
}

impl OutputConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            prefixed: cli.prefixed,
            quiet: cli.quiet,
            verbose: cli.verbose,
            output_format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

/// Everything a run needs, resolved once from the command line
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub base_dir: PathBuf,
    pub options: TagOptions,
    pub output: OutputConfig,
    pub error_log: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let options = TagOptions {
            variant: cli.variant,
            mode: cli.mode.unwrap_or_else(|| cli.variant.default_mode()),
            version: if cli.id3v23 {
                Version::Id3v23
            } else {
                Version::Id3v24
            },
            dry_run: cli.dry_run,
        };

        Self {
            base_dir: cli.base_dir.clone(),
            options,
            output: OutputConfig::from_cli(cli),
            error_log: cli.error_log.clone(),
        }
    }
}
