// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subshift::app_config::{self, Config};
use subshift::app_controller::{Controller, ShiftRequest};
use subshift::subtitle_processor::LineEnding;
use subshift::timecode;

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
    /// Shift subtitle timings by a fixed offset
    Shift(ShiftArgs),

    /// Report timing problems (inverted ranges, overlaps) without changing anything
    Check {
        /// SRT file to check
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Generate shell completions for subshift
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ShiftArgs {
    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Offset: milliseconds (-1500), seconds (2.5s) or a timestamp (-00:00:01,500)
    #[arg(short, long, allow_hyphen_values = true)]
    offset: String,

    /// Sequence numbers to shift, e.g. "1,4-6". Without a selection every entry is shifted
    #[arg(short, long)]
    select: Option<String>,

    /// Only shift entries starting at or after this timestamp (HH:MM:SS,mmm)
    #[arg(short, long)]
    after: Option<String>,

    /// Output file, or output directory when INPUT_PATH is a directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Write CRLF line endings
    #[arg(long)]
    crlf: bool,

    /// Run the timing check on the shifted result
    #[arg(long)]
    validate: bool,
}

/// SubShift - shift SRT subtitle timings
#[derive(Parser, Debug)]
#[command(name = "subshift")]
#[command(author = "SubShift Team")]
#[command(version)]
#[command(about = "Shift SRT subtitle timings")]
#[command(long_about = "SubShift moves the timestamps of some or all cues in an SRT file by a fixed offset.

EXAMPLES:
    subshift shift movie.srt -o 1500              # Delay every cue by 1.5 seconds
    subshift shift movie.srt -o -2.5s             # Show every cue 2.5 seconds earlier
    subshift shift movie.srt -o 800 -s 12-40      # Only shift cues 12 to 40
    subshift shift movie.srt -o -1s -a 00:30:00,000  # Shift cues after the 30 minute mark
    subshift shift /subs/ -o 500 -f               # Shift every .srt file below a directory
    subshift check movie.srt                      # Report inverted or overlapping cues
    subshift completions bash > subshift.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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

    // @returns: ANSI color and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; log::set_max_level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level((&level).into());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subshift", &mut std::io::stdout());
            Ok(())
        }
        Commands::Check { input_path } => {
            let controller = Controller::with_config(load_config(&cli.config_path, cli.log_level.is_some())?)?;
            let result = controller.check_file(&input_path)?;
            if result.passed {
                Ok(())
            } else {
                Err(anyhow!("{} timing issue(s) found in {:?}", result.total_issues, input_path))
            }
        }
        Commands::Shift(args) => {
            let controller = Controller::with_config(load_config(&cli.config_path, cli.log_level.is_some())?)?;
            run_shift(&controller, args)
        }
    }
}

// Load the configuration, creating a default file when none exists
fn load_config(config_path: &str, log_level_from_cli: bool) -> Result<Config> {
    let config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    // If log level was not set via command line, update it from config now
    if !log_level_from_cli {
        log::set_max_level((&config.log_level).into());
    }

    Ok(config)
}

fn run_shift(controller: &Controller, args: ShiftArgs) -> Result<()> {
    let offset_ms = timecode::parse_offset(&args.offset)?;
    let after_ms = args
        .after
        .as_deref()
        .map(timecode::parse_timestamp)
        .transpose()?;

    let request = ShiftRequest {
        input: args.input_path,
        output: args.output,
        offset_ms,
        select: args.select,
        after_ms,
        force_overwrite: args.force_overwrite,
        line_ending: args.crlf.then_some(LineEnding::Crlf),
        validate: args.validate,
    };

    info!("Shifting {:?} by {}ms", request.input, request.offset_ms);
    controller.run(&request)
}
