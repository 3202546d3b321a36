// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use bilisub::app_config::{Config, LogLevel};
use bilisub::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for bilisub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// bilisub - Bilibili subtitle downloader
///
/// Downloads the CC subtitles of Bilibili videos and converts them to SRT.
#[derive(Parser, Debug)]
#[command(name = "bilisub")]
#[command(version)]
#[command(about = "Download Bilibili subtitles as JSON and SRT")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "bilisub fetches the subtitle tracks of Bilibili videos and writes, for every part,
the raw timed-text JSON and its SRT conversion into output_<BV ID>/.

EXAMPLES:
    bilisub                                  # Interactive mode: prompt for one BV ID
    bilisub BV1Jm421p7RV                     # Download one video
    bilisub BV1Jm421p7RV BV1xx411c7mD        # Download several videos in order
    bilisub -f bv_ids.txt                    # Read BV IDs from a file, one per line
    bilisub --language ai-zh BV1Jm421p7RV    # Prefer a specific subtitle language
    bilisub completions bash > bilisub.bash  # Generate bash completions

COOKIES:
    Put the value of your browser's Cookie header into cookies.txt (or the file
    given with --cookies) to access subtitles that require a login.

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// BV IDs to process
    #[arg(value_name = "BV_ID")]
    ids: Vec<String>,

    /// File with one BV ID per line
    #[arg(short = 'f', long = "file", value_name = "PATH", conflicts_with = "ids")]
    file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: PathBuf,

    /// Cookie file path
    #[arg(long, value_name = "PATH")]
    cookies: Option<PathBuf>,

    /// Directory under which output_<BV ID> directories are created
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Preferred subtitle language code (e.g. 'zh-CN', 'ai-zh', 'en-US')
    #[arg(long)]
    language: Option<String>,

    /// Minimum delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger writing colored lines to stdout
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger; the level can be changed later with log::set_max_level
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "bilisub", &mut std::io::stdout());
        return Ok(());
    }

    run_download(cli).await
}

async fn run_download(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(cookies) = &options.cookies {
        config.cookies_path = cookies.clone();
    }
    if let Some(output_dir) = &options.output_dir {
        config.output.root_dir = output_dir.clone();
    }
    if let Some(language) = &options.language {
        config.subtitles.preferred_language = Some(language.clone());
    }
    if let Some(delay_ms) = options.delay_ms {
        config.rate_limit.request_delay_ms = delay_ms;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    let ids = if let Some(path) = &options.file {
        info!("=== Bilibili Subtitle Downloader (File Mode) ===");
        info!("Reading BV IDs from file: {}", path.display());

        let ids = Controller::read_ids_from_file(path);
        if ids.is_empty() {
            warn!("No valid BV IDs found in {}. Exiting.", path.display());
            return Ok(());
        }

        info!("Found {} BV IDs to process.", ids.len());
        ids
    } else if !options.ids.is_empty() {
        info!("=== Bilibili Subtitle Downloader (Command Line Mode) ===");
        options.ids.clone()
    } else {
        info!("=== Bilibili Subtitle Downloader (Interactive Mode) ===");
        vec![prompt_for_id().await?]
    };

    controller.run_batch(&ids).await;

    Ok(())
}

// Ask for a single BV ID on stdin
async fn prompt_for_id() -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Please enter the BV ID (e.g., BV1Jm421p7RV): ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read BV ID from stdin")?;

    Ok(line.trim().to_string())
}
