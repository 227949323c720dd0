/*!
 * Decoder backends.
 *
 * The external decoding tool is an opaque process: it is given a source file,
 * a time range and an output path, and reports success through its exit status.
 * - `ffmpeg`: spawns the real tool
 * - `mock`: records invocations and simulates outcomes for tests
 */

use async_trait::async_trait;
use std::ffi::OsString;
use std::fmt::Debug;
use std::path::PathBuf;

use crate::errors::ExtractionError;

/// Target bitrate of every clip, in bit/s
pub const AUDIO_BITRATE: u32 = 16_000;

/// Target sample rate of every clip, in Hz
pub const AUDIO_SAMPLE_RATE: u32 = 16_000;

/// Every clip is mono
pub const AUDIO_CHANNELS: u32 = 1;

/// Everything the decoder needs to cut one clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderInvocation {
    /// Source media file
    pub input: PathBuf,
    /// Seek start, decoder syntax (`HH:MM:SS.mmm`)
    pub start: String,
    /// Seek end, decoder syntax
    pub end: String,
    /// Clip destination
    pub output: PathBuf,
}

impl DecoderInvocation {
    /// Command-line arguments in decoder order:
    /// input, seek start, seek end, strip video, bitrate, sample rate, channels, output
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            "-i".into(),
            self.input.clone().into_os_string(),
            "-ss".into(),
            self.start.clone().into(),
            "-to".into(),
            self.end.clone().into(),
            "-vn".into(),
            "-ab".into(),
            AUDIO_BITRATE.to_string().into(),
            "-ar".into(),
            AUDIO_SAMPLE_RATE.to_string().into(),
            "-ac".into(),
            AUDIO_CHANNELS.to_string().into(),
            self.output.clone().into_os_string(),
        ]
    }
}

/// Terminal state of one extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Exit status was exactly zero
    Succeeded,
    /// The tool ran and exited non-zero (`code` is `None` when killed by a signal)
    Failed { code: Option<i32>, detail: String },
    /// The tool could not be launched, or was killed after timing out
    Errored { cause: String },
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Attach the subtitle index and turn failures into errors
    pub fn into_result(self, index: usize) -> Result<(), ExtractionError> {
        match self {
            Self::Succeeded => Ok(()),
            Self::Failed { code, detail } => Err(ExtractionError::Failed { index, code, detail }),
            Self::Errored { cause } => Err(ExtractionError::Errored { index, cause }),
        }
    }
}

/// Common trait for decoder backends
///
/// Implementations never return early through a panic or error type; every way
/// an invocation can end is an `ExtractionOutcome`.
#[async_trait]
pub trait Decoder: Send + Sync + Debug {
    /// Run one invocation to completion
    async fn decode(&self, invocation: &DecoderInvocation) -> ExtractionOutcome;
}

pub mod ffmpeg;
pub mod mock;

pub use ffmpeg::FfmpegDecoder;
pub use mock::{MockBehavior, MockDecoder};
