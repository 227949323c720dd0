/*!
 * Error types for the subclip application.
 *
 * Validation errors abort a run before any clip is extracted, extraction errors
 * are local to one subtitle entry. Both are defined with the thiserror crate.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Problems found before any extraction is attempted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required option was not supplied (or was empty)
    #[error("{0} is a required argument")]
    MissingArgument(String),

    /// A required path does not exist or cannot be accessed
    #[error("file {} could not be found", .0.display())]
    FileNotFound(PathBuf),

    /// Two or more subtitle entries share an index and would write the same clip
    #[error("subtitle index {index} appears {count} times")]
    DuplicateIndex {
        /// The colliding index
        index: usize,
        /// How many entries carry it
        count: usize,
    },
}

/// Failure of a single subtitle entry's extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The decoder ran and exited with a non-zero status
    #[error("extraction of entry {index} failed with code {}: {detail}", display_code(.code))]
    Failed {
        /// Subtitle index
        index: usize,
        /// Exit code, `None` when the process was terminated by a signal
        code: Option<i32>,
        /// Filtered decoder stderr
        detail: String,
    },

    /// The decoder could not be launched, or was killed after its timeout
    #[error("extraction of entry {index} errored: {cause}")]
    Errored {
        /// Subtitle index
        index: usize,
        /// Underlying cause
        cause: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl ExtractionError {
    /// Index of the subtitle entry this error belongs to
    pub fn index(&self) -> usize {
        match self {
            Self::Failed { index, .. } | Self::Errored { index, .. } => *index,
        }
    }
}

/// Anything a pipeline run can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Input validation error (fatal to the run)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Per-entry extraction error (run continues)
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The output directory could not be resolved to an absolute path
    #[error("Output directory error: {0}")]
    OutputDirectory(String),
}

impl PipelineError {
    /// Whether this error prevented the whole run from starting
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Extraction(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the extraction pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
