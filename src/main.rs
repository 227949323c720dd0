// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use subclip::app_config::{self, Config};
use subclip::Controller;

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
    /// Generate shell completions for subclip
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Subtitle file (SRT) describing the clips
    #[arg(short, long)]
    subtitle: Option<PathBuf>,

    /// Source media file the audio is cut from
    #[arg(short = 'i', long)]
    source: Option<PathBuf>,

    /// Directory the clips are written to [default: .]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Prefix prepended to every clip filename
    #[arg(short = 'p', long)]
    output_prefix: Option<String>,

    /// Log every extraction before it starts
    #[arg(short, long)]
    verbose: bool,

    /// Manifest file [default: <OUTPUT_DIR>/transcription.txt]
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Pause after each successful extraction, in milliseconds [default: 400]
    #[arg(long)]
    settle_delay_ms: Option<u64>,

    /// Number of extractions running at once [default: 1]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Stop launching extractions after the first failure
    #[arg(long)]
    stop_on_error: bool,

    /// Decoder executable [default: ffmpeg]
    #[arg(long, value_name = "PROGRAM")]
    ffmpeg: Option<String>,

    /// Kill an extraction that runs longer than this many seconds [default: 120]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Overwrite clips that already exist
    #[arg(short = 'y', long)]
    overwrite: bool,

    /// Configuration file path (JSON)
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl ExtractArgs {
    // @applies: Command line values over the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(subtitle) = &self.subtitle {
            config.subtitle = Some(subtitle.clone());
        }
        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(prefix) = &self.output_prefix {
            config.output_prefix = prefix.clone();
        }
        if let Some(manifest) = &self.manifest {
            config.manifest = Some(manifest.clone());
        }
        if let Some(delay) = self.settle_delay_ms {
            config.settle_delay_ms = delay;
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrent_extractions = jobs;
        }
        if let Some(program) = &self.ffmpeg {
            config.decoder.program = program.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.decoder.timeout_secs = Some(timeout);
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone().into();
        }
        config.verbose |= self.verbose;
        config.stop_on_error |= self.stop_on_error;
        config.decoder.overwrite |= self.overwrite;
    }
}

/// subclip - cut a speech dataset out of captioned media
///
/// Extracts one 16 kHz mono clip per subtitle entry with ffmpeg and writes a
/// manifest pairing each clip with its transcript.
#[derive(Parser, Debug)]
#[command(name = "subclip")]
#[command(version)]
#[command(about = "Build speech datasets from subtitles and media files")]
#[command(long_about = "subclip cuts one audio clip per subtitle entry out of a media file and writes a
tab-separated manifest mapping every clip to its normalized transcript.

EXAMPLES:
    subclip -s movie.srt -i movie.mkv                        # Clips and manifest in the current directory
    subclip -s movie.srt -i movie.mkv -o data -p movie_      # data/movie_000001.wav, ...
    subclip -s movie.srt -i movie.mkv -v --stop-on-error     # Log every entry, stop at the first failure
    subclip -c conf.json                                     # Take every option from a config file
    subclip completions bash > subclip.bash                  # Generate bash completions

CONFIGURATION:
    Options can be stored in a JSON file using the long option names
    (\"subtitle\", \"source\", \"output-dir\", \"output-prefix\", \"verbose\", ...).
    Command line options override the file. A default file is created when the
    given path does not exist.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    extract: ExtractArgs,
}

// @struct: Colored stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything up to trace is let through the logger; the max level filters
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subclip", &mut std::io::stdout());
        return Ok(());
    }

    run_extract(cli.extract).await
}

async fn run_extract(args: ExtractArgs) -> Result<()> {
    let mut config = load_config(args.config_path.as_deref())?;
    args.apply_to(&mut config);

    // Verbose notices are logged at info level
    let mut max_level = level_filter(&config.log_level);
    if config.verbose && max_level < LevelFilter::Info {
        max_level = LevelFilter::Info;
    }
    log::set_max_level(max_level);

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;

    let summary = controller.run().await?;
    if !summary.is_success() {
        let failed = summary.report.errors.len() + summary.report.skipped;
        return Err(anyhow!(
            "{} of {} entries were not extracted",
            failed,
            summary.report.attempted + summary.report.skipped
        ));
    }

    Ok(())
}

// @loads: Config file, or defaults when no file was given
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    if path.exists() {
        return Config::from_file(path);
    }

    warn!("Config file not found at {:?}, creating default config.", path);
    let config = Config::default();
    config.save(path)?;
    Ok(config)
}
