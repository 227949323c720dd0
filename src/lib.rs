/*!
 * # subclip - speech datasets from captioned media
 *
 * Cuts one short audio clip per subtitle entry out of a media file and writes a
 * manifest pairing every clip with its normalized transcript.
 *
 * ## Features
 *
 * - Deterministic clip names (`{prefix}{index:06}.wav`)
 * - 16 kHz mono clips cut by ffmpeg
 * - Transcripts flattened to a single delimiter-safe line
 * - All input problems reported at once, before any extraction
 * - Per-entry failure isolation, optional bounded concurrency with a settle delay
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT reading
 * - `dataset`: The extraction pipeline:
 *   - `dataset::timecode`, `dataset::naming`, `dataset::transcript`: pure helpers
 *   - `dataset::validation`: input checks
 *   - `dataset::extractor`: one clip per decoder invocation
 *   - `dataset::pipeline`: orchestration
 * - `decoder`: Decoder backends (ffmpeg process, mock)
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod app_controller;
pub mod dataset;
pub mod decoder;
pub mod errors;
pub mod file_utils;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use dataset::{DatasetPipeline, PipelineReport, TranscriptLine};
pub use decoder::{Decoder, ExtractionOutcome, FfmpegDecoder};
pub use errors::{AppError, ExtractionError, PipelineError, ValidationError};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
