use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration module
/// This module handles the run configuration including loading,
/// validating and saving configuration settings.
/// Keys are kebab-case in the JSON file (`output-dir`, `output-prefix`, ...).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Subtitle track to read (required)
    #[serde(default)]
    pub subtitle: Option<PathBuf>,

    /// Media file the clips are cut from (required)
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Directory the clips are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prepended to every clip filename
    #[serde(default)]
    pub output_prefix: String,

    /// Log a notice for every entry before it is extracted
    #[serde(default, alias = "v")]
    pub verbose: bool,

    /// Manifest destination, `<output-dir>/transcription.txt` when unset
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Pause after every successful extraction, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Number of extractions allowed in flight at once
    #[serde(default = "default_max_concurrent_extractions")]
    pub max_concurrent_extractions: usize,

    /// Stop launching extractions after the first failed entry
    #[serde(default)]
    pub stop_on_error: bool,

    /// External decoder settings
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the external decoding tool
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DecoderConfig {
    // @field: Executable name or path
    #[serde(default = "default_decoder_program")]
    pub program: String,

    // @field: Kill an extraction running longer than this; null disables
    #[serde(default = "default_decoder_timeout_secs")]
    pub timeout_secs: Option<u64>,

    // @field: Replace existing clips instead of failing on them
    #[serde(default)]
    pub overwrite: bool,
}

impl DecoderConfig {
    // @returns: Timeout as a Duration, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            program: default_decoder_program(),
            timeout_secs: default_decoder_timeout_secs(),
            overwrite: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_settle_delay_ms() -> u64 {
    400
}

fn default_max_concurrent_extractions() -> usize {
    1 // sequential
}

fn default_decoder_program() -> String {
    "ffmpeg".to_string()
}

fn default_decoder_timeout_secs() -> Option<u64> {
    Some(120)
}

/// File the manifest is written to when `manifest` is not set
pub const DEFAULT_MANIFEST_NAME: &str = "transcription.txt";

impl Config {
    /// Validate the static parts of the configuration.
    ///
    /// Presence of `subtitle` and `source` is checked by the pipeline's input
    /// validation so that every problem is reported at once.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_extractions == 0 {
            return Err(anyhow!("max-concurrent-extractions must be at least 1"));
        }

        if self.decoder.program.trim().is_empty() {
            return Err(anyhow!("decoder program must not be empty"));
        }

        if self.decoder.timeout_secs == Some(0) {
            return Err(anyhow!("decoder timeout must be greater than zero (use null to disable)"));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Where the manifest of this run should be written
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.output_dir.join(DEFAULT_MANIFEST_NAME))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            subtitle: None,
            source: None,
            output_dir: default_output_dir(),
            output_prefix: String::new(),
            verbose: false,
            manifest: None,
            settle_delay_ms: default_settle_delay_ms(),
            max_concurrent_extractions: default_max_concurrent_extractions(),
            stop_on_error: false,
            decoder: DecoderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
