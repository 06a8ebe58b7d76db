// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod ass_parser;
mod errors;
mod file_utils;
mod overlay_renderer;
mod storage;
mod subtitle_processor;
mod transcription_service;

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
    /// Generate subtitles for a video via speech-to-text (default command)
    Transcribe(TranscribeArgs),

    /// Burn the captions of an ASS script onto a video
    Burn {
        /// Input video file
        #[arg(value_name = "VIDEO_PATH")]
        video_path: PathBuf,

        /// ASS subtitle script to burn
        #[arg(value_name = "SCRIPT_PATH")]
        script_path: PathBuf,

        /// Output video path (default: <video_name>.subtitled.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,

        /// Set logging level
        #[arg(short, long, value_enum)]
        log_level: Option<CliLogLevel>,
    },

    /// Download an object from the configured storage bucket
    Fetch {
        /// Object name in the storage bucket
        #[arg(value_name = "OBJECT_NAME")]
        object_name: String,

        /// Local output path (default: object name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,

        /// Set logging level
        #[arg(short, long, value_enum)]
        log_level: Option<CliLogLevel>,
    },

    /// Report the recursive size of a directory
    Du {
        /// Directory to measure (default: current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Generate shell completions for subpress
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model name (e.g., 'tiny', 'base', 'small', 'medium', 'large')
    #[arg(short, long)]
    model: Option<String>,

    /// Spoken language hint (e.g., 'en'); omit for auto-detection
    #[arg(short, long)]
    source_language: Option<String>,

    /// Disable word-level timestamps and the JSON output file
    #[arg(long)]
    no_word_level: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subpress - video subtitling toolkit
///
/// Extracts audio from videos, transcribes speech to SRT and word-level JSON
/// subtitles, and burns styled ASS captions onto video.
#[derive(Parser, Debug)]
#[command(name = "subpress")]
#[command(version = "1.0.0")]
#[command(about = "Video transcription and caption burning tool")]
#[command(long_about = "subpress generates subtitles for videos with a local whisper model and
burns styled ASS captions onto video with ffmpeg.

EXAMPLES:
    subpress movie.mp4                          # Transcribe using default config
    subpress -f movie.mp4                       # Force overwrite existing files
    subpress -m small movie.mp4                 # Use a specific whisper model
    subpress --no-word-level movie.mp4          # Skip the word-timestamps JSON
    subpress burn movie.mp4 captions.ass        # Burn ASS captions onto the video
    subpress fetch example.mp4                  # Download a video from storage
    subpress du /videos                         # Report directory size
    subpress completions bash > subpress.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model name (e.g., 'tiny', 'base', 'small', 'medium', 'large')
    #[arg(short, long)]
    model: Option<String>,

    /// Spoken language hint (e.g., 'en'); omit for auto-detection
    #[arg(short, long)]
    source_language: Option<String>,

    /// Disable word-level timestamps and the JSON output file
    #[arg(long)]
    no_word_level: bool,

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
                "{}{} {} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subpress", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        Some(Commands::Burn { video_path, script_path, output, force_overwrite, config_path, log_level }) => {
            let config = load_config(&config_path, log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            controller.run_burn(video_path, script_path, output, force_overwrite).await
        }
        Some(Commands::Fetch { object_name, output, config_path, log_level }) => {
            let config = load_config(&config_path, log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            let output_path = output.unwrap_or_else(|| PathBuf::from(&object_name));
            controller.run_fetch(&object_name, output_path).await
        }
        Some(Commands::Du { path }) => {
            let controller = Controller::with_config(Config::default())?;
            controller.run_directory_size(&path)?;
            Ok(())
        }
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let transcribe_args = TranscribeArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                source_language: cli.source_language,
                no_word_level: cli.no_word_level,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_transcribe(transcribe_args).await
        }
    }
}

/// Load config from disk, creating a default one when missing, and apply the
/// optional CLI log level
fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = cli_log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    let config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli_log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

async fn run_transcribe(options: TranscribeArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.whisper.model = model.clone();
    }

    if let Some(language) = &options.source_language {
        config.whisper.language = Some(language.clone());
    }

    if options.no_word_level {
        config.whisper.word_level = false;
    }

    // Re-validate after applying overrides
    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller.run_transcribe(
            options.input_path.clone(),
            options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            options.force_overwrite,
        ).await
    } else if options.input_path.is_dir() {
        controller.run_transcribe_folder(
            options.input_path.clone(),
            options.force_overwrite,
        ).await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
