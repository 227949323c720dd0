/*!
 * Dataset pipeline orchestration.
 *
 * Validates the inputs once, then extracts one clip per subtitle entry and
 * collects a manifest record for every clip that was actually produced.
 * Per-entry failures are recorded and the run moves on to the next entry.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::app_config::Config;
use crate::decoder::Decoder;
use crate::errors::{ExtractionError, PipelineError};
use crate::subtitle_processor::SubtitleEntry;

use super::extractor::{SegmentExtractor, DEFAULT_SETTLE_DELAY};
use super::naming::ClipNamer;
use super::transcript::TranscriptLine;
use super::validation::{validate_config, validate_entries};

/// Result of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    /// One record per produced clip, in entry order
    pub manifest_lines: Vec<TranscriptLine>,
    /// Validation errors, or per-entry errors in entry order
    pub errors: Vec<PipelineError>,
    /// Entries handed to the decoder
    pub attempted: usize,
    /// Entries not launched because the run stopped early
    pub skipped: usize,
}

impl PipelineReport {
    fn aborted(errors: Vec<PipelineError>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Manifest text: every record concatenated
    pub fn manifest(&self) -> String {
        self.manifest_lines.iter().map(ToString::to_string).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.manifest_lines.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.skipped == 0
    }

    /// Whether the run was rejected before any extraction
    pub fn was_aborted(&self) -> bool {
        self.errors.iter().any(PipelineError::is_fatal)
    }

    /// Per-entry extraction errors
    pub fn extraction_errors(&self) -> impl Iterator<Item = &ExtractionError> {
        self.errors.iter().filter_map(|error| match error {
            PipelineError::Extraction(e) => Some(e),
            _ => None,
        })
    }
}

/// Drives validation and extraction for a whole subtitle track
#[derive(Debug, Clone)]
pub struct DatasetPipeline<D> {
    extractor: SegmentExtractor<D>,
    max_concurrent: usize,
    stop_on_error: bool,
}

impl<D: Decoder> DatasetPipeline<D> {
    /// Sequential pipeline with the default settle delay
    pub fn new(decoder: D) -> Self {
        Self {
            extractor: SegmentExtractor::new(decoder).with_settle_delay(DEFAULT_SETTLE_DELAY),
            max_concurrent: 1,
            stop_on_error: false,
        }
    }

    /// Pipeline tuned by the throttling options of `config`
    pub fn from_config(decoder: D, config: &Config) -> Self {
        Self::new(decoder)
            .with_settle_delay(config.settle_delay())
            .with_max_concurrent(config.max_concurrent_extractions)
            .with_stop_on_error(config.stop_on_error)
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.extractor = self.extractor.with_settle_delay(settle_delay);
        self
    }

    /// Extractions allowed in flight at once; 1 keeps the run strictly sequential
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    pub fn extractor(&self) -> &SegmentExtractor<D> {
        &self.extractor
    }

    pub async fn run(&self, entries: &[SubtitleEntry], config: &Config) -> PipelineReport {
        self.run_with_progress(entries, config, |_, _| {}).await
    }

    /// Run the pipeline, calling `progress(done, total)` after each entry resolves.
    ///
    /// Entries skipped after a stop-on-error halt count as resolved, so `done` always reaches `total`.
    pub async fn run_with_progress(
        &self,
        entries: &[SubtitleEntry],
        config: &Config,
        progress: impl Fn(usize, usize),
    ) -> PipelineReport {
        let mut validation_errors = validate_config(config).await;
        validation_errors.extend(validate_entries(entries));
        if !validation_errors.is_empty() {
            return PipelineReport::aborted(validation_errors.into_iter().map(PipelineError::from).collect());
        }

        // Present after validation
        let Some(source) = config.source.as_deref() else {
            return PipelineReport::aborted(Vec::new());
        };

        let namer = match ClipNamer::new(&config.output_dir, config.output_prefix.as_str()) {
            Ok(namer) => namer,
            Err(e) => {
                return PipelineReport::aborted(vec![PipelineError::OutputDirectory(format!(
                    "{}: {}",
                    config.output_dir.display(),
                    e
                ))]);
            }
        };

        let total = entries.len();
        info!("Extracting {} clips from {:?} into {:?}", total, source, namer.output_dir());

        let halted = AtomicBool::new(false);
        let resolved = AtomicUsize::new(0);
        let halted = &halted;
        let resolved = &resolved;
        let namer = &namer;
        let progress = &progress;
        let verbose = config.verbose;

        let mut results = stream::iter(entries.iter().enumerate())
            .map(|(position, entry)| async move {
                if halted.load(Ordering::SeqCst) {
                    progress(resolved.fetch_add(1, Ordering::SeqCst) + 1, total);
                    return (position, None);
                }

                let result = self.extract_entry(entry, namer, source, verbose).await;
                if result.is_err() && self.stop_on_error {
                    halted.store(true, Ordering::SeqCst);
                }

                progress(resolved.fetch_add(1, Ordering::SeqCst) + 1, total);
                (position, Some(result))
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        // Restore entry order
        results.sort_by_key(|(position, _)| *position);

        let mut report = PipelineReport::default();
        for (_, result) in results {
            match result {
                Some(Ok(line)) => {
                    report.attempted += 1;
                    report.manifest_lines.push(line);
                }
                Some(Err(error)) => {
                    report.attempted += 1;
                    report.errors.push(PipelineError::Extraction(error));
                }
                None => report.skipped += 1,
            }
        }

        if report.skipped > 0 {
            warn!("Stopped after the first failure, {} entries were not extracted", report.skipped);
        }

        report
    }

    async fn extract_entry(
        &self,
        entry: &SubtitleEntry,
        namer: &ClipNamer,
        source: &Path,
        verbose: bool,
    ) -> Result<TranscriptLine, ExtractionError> {
        let clip = namer.describe(entry.index);

        if verbose {
            info!("extracting {} -> {} and saving as {}", entry.start, entry.end, clip.path.display());
        } else {
            debug!("extracting {} -> {} and saving as {}", entry.start, entry.end, clip.path.display());
        }

        match self.extractor.extract(entry, &clip, source).await.into_result(entry.index) {
            Ok(()) => Ok(TranscriptLine::build(&entry.text, &clip.filename)),
            Err(error) => {
                warn!("{}", error);
                Err(error)
            }
        }
    }
}
