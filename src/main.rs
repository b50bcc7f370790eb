// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, Strategy, OutputFormat};
use crate::extract::TrackFormat;
use app_controller::Controller;

mod app_config;
mod time_model;
mod cue;
mod extract;
mod align;
mod render;
mod file_utils;
mod app_controller;
mod errors;

/// CLI Wrapper for Strategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStrategy {
    Timeline,
    Paired,
}

impl From<CliStrategy> for Strategy {
    fn from(cli_strategy: CliStrategy) -> Self {
        match cli_strategy {
            CliStrategy::Timeline => Strategy::Timeline,
            CliStrategy::Paired => Strategy::Paired,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Text => OutputFormat::Text,
        }
    }
}

/// CLI Wrapper for TrackFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTrackFormat {
    Ttml,
    Dfxp,
}

impl From<CliTrackFormat> for TrackFormat {
    fn from(cli_format: CliTrackFormat) -> Self {
        match cli_format {
            CliTrackFormat::Ttml => TrackFormat::Ttml,
            CliTrackFormat::Dfxp => TrackFormat::Dfxp,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge two subtitle tracks into a bilingual output (default command)
    Merge(MergeArgs),

    /// Generate shell completions for dualsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Primary-track subtitle file or directory
    #[arg(value_name = "PRIMARY")]
    primary: PathBuf,

    /// Secondary-track subtitle file or directory
    #[arg(value_name = "SECONDARY")]
    secondary: PathBuf,

    /// Output directory (defaults to the primary input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Alignment strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Maximum start-time gap for a paired match, in seconds
    #[arg(short = 'g', long)]
    max_gap: Option<f64>,

    /// Secondary cues considered per primary cue
    #[arg(short = 'w', long)]
    search_window: Option<usize>,

    /// Cues the search cursor may step backward from its committed position
    #[arg(short, long)]
    backtrack: Option<usize>,

    /// Output rendering format
    #[arg(short = 'r', long, value_enum)]
    output_format: Option<CliOutputFormat>,

    /// Markup format of the primary track (detected when omitted)
    #[arg(long, value_enum)]
    primary_format: Option<CliTrackFormat>,

    /// Markup format of the secondary track (detected when omitted)
    #[arg(long, value_enum)]
    secondary_format: Option<CliTrackFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dualsub - bilingual subtitle merger
///
/// Combines two independently-timed subtitle tracks (one per language) into a
/// single SRT or plain-text output, aligning cues by start-time proximity.
#[derive(Parser, Debug)]
#[command(name = "dualsub")]
#[command(version = "1.0.0")]
#[command(about = "Bilingual subtitle merging tool")]
#[command(long_about = "dualsub extracts cues from two timed-text documents (TTML/DFXP) and merges
them into one bilingual subtitle file.

EXAMPLES:
    dualsub show.en.xml show.fr.xml             # Merge with default config
    dualsub -s timeline show.en.xml show.fr.xml # Chronological interleave
    dualsub -g 0.5 show.en.xml show.fr.xml      # Tighter match threshold
    dualsub -r text show.en.xml show.fr.xml     # Untimed transcript output
    dualsub en/ fr/ -o merged/                  # Merge stem-matched pairs
    dualsub completions bash > dualsub.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

STRATEGIES:
    paired    - One entry per primary cue; the closest secondary cue within the
                gap threshold contributes a second text line (default)
    timeline  - Every cue from both tracks, interleaved chronologically")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Primary-track subtitle file or directory
    #[arg(value_name = "PRIMARY")]
    primary: Option<PathBuf>,

    /// Secondary-track subtitle file or directory
    #[arg(value_name = "SECONDARY")]
    secondary: Option<PathBuf>,

    /// Output directory (defaults to the primary input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Alignment strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Maximum start-time gap for a paired match, in seconds
    #[arg(short = 'g', long)]
    max_gap: Option<f64>,

    /// Secondary cues considered per primary cue
    #[arg(short = 'w', long)]
    search_window: Option<usize>,

    /// Cues the search cursor may step backward from its committed position
    #[arg(short, long)]
    backtrack: Option<usize>,

    /// Output rendering format
    #[arg(short = 'r', long, value_enum)]
    output_format: Option<CliOutputFormat>,

    /// Markup format of the primary track (detected when omitted)
    #[arg(long, value_enum)]
    primary_format: Option<CliTrackFormat>,

    /// Markup format of the secondary track (detected when omitted)
    #[arg(long, value_enum)]
    secondary_format: Option<CliTrackFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dualsub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Merge(args)) => run_merge(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let primary = cli.primary.ok_or_else(|| {
                anyhow!("PRIMARY is required when no subcommand is specified")
            })?;
            let secondary = cli.secondary.ok_or_else(|| {
                anyhow!("SECONDARY is required when no subcommand is specified")
            })?;

            let merge_args = MergeArgs {
                primary,
                secondary,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                strategy: cli.strategy,
                max_gap: cli.max_gap,
                search_window: cli.search_window,
                backtrack: cli.backtrack,
                output_format: cli.output_format,
                primary_format: cli.primary_format,
                secondary_format: cli.secondary_format,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_merge(merge_args)
        }
    }
}

fn run_merge(options: MergeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(strategy) = &options.strategy {
        config.strategy = strategy.clone().into();
    }
    if let Some(max_gap) = options.max_gap {
        config.alignment.max_gap_seconds = max_gap;
    }
    if let Some(search_window) = options.search_window {
        config.alignment.search_window = search_window;
    }
    if let Some(backtrack) = options.backtrack {
        config.alignment.backtrack = backtrack;
    }
    if let Some(output_format) = &options.output_format {
        config.output_format = output_format.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(level_filter_for(&config.log_level));

    // Controller validates the merged configuration before any cue is read
    let controller = Controller::with_config(config)?.with_formats(
        options.primary_format.map(|f| f.into()),
        options.secondary_format.map(|f| f.into()),
    );

    let output_dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => options
            .primary
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    if options.primary.is_dir() {
        if !options.secondary.is_dir() {
            return Err(anyhow!(
                "PRIMARY is a directory but SECONDARY is not: {:?}",
                options.secondary
            ));
        }
        controller.run_folder(
            &options.primary,
            &options.secondary,
            &output_dir,
            options.force_overwrite,
        )
    } else {
        controller
            .run_pair(
                &options.primary,
                &options.secondary,
                &output_dir,
                options.force_overwrite,
            )
            .map(|_| ())
    }
}

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
