/*!
 * ffmpeg process backend.
 */

use async_trait::async_trait;
use log::{debug, trace};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::DecoderConfig;
use super::{Decoder, DecoderInvocation, ExtractionOutcome};

// Banner line listing a linked library version, e.g. `libavutil      58.  2.100 / 58.  2.100`
static LIBRARY_VERSION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^lib\w+\s+\d+\.\s*\d+\.\s*\d+\s*/").unwrap()
});

/// Spawns the decoding tool once per invocation
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    program: String,
    timeout: Option<Duration>,
    overwrite: bool,
}

impl FfmpegDecoder {
    /// Decoder running `program` with no timeout and no overwrite flag
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            overwrite: false,
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            program: config.program.clone(),
            timeout: config.timeout(),
            overwrite: config.overwrite,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, invocation: &DecoderInvocation) -> Command {
        let mut command = Command::new(&self.program);
        if self.overwrite {
            command.arg("-y");
        }
        command
            .args(invocation.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Keep only the meaningful stderr lines, dropping the version banner,
    /// build configuration and stream metadata noise.
    pub fn filter_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "ffmpeg version",
            "built with",
            "configuration:",
            "Input #",
            "Metadata:",
            "Duration:",
            "Chapter",
            "Stream #",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "size=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .filter(|line| !LIBRARY_VERSION_LINE.is_match(line))
            .collect();

        if meaningful.is_empty() {
            "no diagnostic output".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::from_config(&DecoderConfig::default())
    }
}

#[async_trait]
impl Decoder for FfmpegDecoder {
    async fn decode(&self, invocation: &DecoderInvocation) -> ExtractionOutcome {
        trace!("{} {:?}", self.program, invocation.to_args());

        let mut command = self.command(invocation);
        let output_future = command.output();

        let result = match self.timeout {
            Some(timeout) => tokio::select! {
                result = output_future => result,
                _ = tokio::time::sleep(timeout) => {
                    // Dropping the output future kills the child
                    return ExtractionOutcome::Errored {
                        cause: format!("{} timed out after {}s", self.program, timeout.as_secs_f64()),
                    };
                }
            },
            None => output_future.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                return ExtractionOutcome::Errored {
                    cause: format!("failed to launch {}: {}", self.program, e),
                };
            }
        };

        match output.status.code() {
            Some(0) => ExtractionOutcome::Succeeded,
            code => {
                let detail = Self::filter_stderr(&String::from_utf8_lossy(&output.stderr));
                debug!("{} exited with {:?}: {}", self.program, code, detail);
                ExtractionOutcome::Failed { code, detail }
            }
        }
    }
}
