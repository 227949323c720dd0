/*!
 * Speech dataset extraction.
 *
 * Turns a subtitle track and its source media into one audio clip per entry
 * plus a manifest of `clip<TAB>transcript` records:
 * - `timecode`: subtitle to decoder timestamp syntax
 * - `naming`: deterministic clip filenames and paths
 * - `transcript`: caption text normalization and manifest records
 * - `validation`: input checks run before any extraction
 * - `extractor`: one decoder invocation per entry, with settle delay
 * - `pipeline`: orchestration, failure isolation and ordering
 */

pub mod extractor;
pub mod naming;
pub mod pipeline;
pub mod timecode;
pub mod transcript;
pub mod validation;

pub use extractor::SegmentExtractor;
pub use naming::{clip_filename, resolve_clip_path, AudioClipDescriptor, ClipNamer};
pub use pipeline::{DatasetPipeline, PipelineReport};
pub use timecode::to_decoder_timestamp;
pub use transcript::{normalize_transcript, TranscriptLine};
pub use validation::{validate_config, validate_entries};
