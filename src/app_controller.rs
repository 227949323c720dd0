use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::dataset::{validate_config, DatasetPipeline, PipelineReport};
use crate::decoder::{Decoder, FfmpegDecoder};
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};

// @module: Application controller for dataset extraction

/// Outcome of a controller run
#[derive(Debug)]
pub struct RunSummary {
    /// What the pipeline produced
    pub report: PipelineReport,
    /// Where the manifest was written, if any clip was produced
    pub manifest_path: Option<PathBuf>,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.report.is_clean()
    }
}

/// Main application controller: reads the track, runs the pipeline, persists the manifest
pub struct Controller {
    // @field: Run configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run against the configured external decoder
    pub async fn run(&self) -> Result<RunSummary> {
        let decoder = FfmpegDecoder::from_config(&self.config.decoder);
        self.run_with_decoder(decoder).await
    }

    /// Run the whole workflow with the given decoder backend.
    ///
    /// Input problems are returned as an error after all of them have been logged,
    /// before the subtitle file is parsed or any directory is created.
    /// Per-entry failures are logged and left in the summary.
    pub async fn run_with_decoder<D: Decoder>(&self, decoder: D) -> Result<RunSummary> {
        let start_time = Instant::now();

        let problems = validate_config(&self.config).await;
        if !problems.is_empty() {
            return Err(Self::report_problems(&problems));
        }

        let entries = self.load_entries()?;

        if !entries.is_empty() {
            FileManager::ensure_dir(&self.config.output_dir)?;
        }

        let pipeline = DatasetPipeline::from_config(decoder, &self.config);
        let progress_bar = self.progress_bar(entries.len());

        let report = match &progress_bar {
            Some(pb) => {
                pipeline
                    .run_with_progress(&entries, &self.config, |done, _| pb.set_position(done as u64))
                    .await
            }
            None => pipeline.run(&entries, &self.config).await,
        };

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        if report.was_aborted() {
            return Err(Self::report_problems(&report.errors));
        }

        let manifest_path = if report.succeeded() > 0 {
            let path = self.config.manifest_path();
            FileManager::write_to_file(&path, &report.manifest())?;
            Some(path)
        } else {
            warn!("No clip was extracted, manifest not written");
            None
        };

        let elapsed = start_time.elapsed();
        self.log_summary(&report, manifest_path.as_ref(), elapsed);

        Ok(RunSummary {
            report,
            manifest_path,
            elapsed,
        })
    }

    fn load_entries(&self) -> Result<Vec<SubtitleEntry>> {
        let path = self
            .config
            .subtitle
            .as_deref()
            .ok_or_else(|| anyhow!("subtitle is a required argument"))?;
        Ok(SubtitleCollection::from_srt_file(path)?.entries)
    }

    // Logs every problem and folds them into one error
    fn report_problems<E: Display>(problems: &[E]) -> anyhow::Error {
        for problem in problems {
            error!("{}", problem);
        }
        let listed: Vec<String> = problems.iter().map(ToString::to_string).collect();
        anyhow!(
            "{} problem(s) with the inputs, nothing was extracted: {}",
            problems.len(),
            listed.join("; ")
        )
    }

    // Verbose runs log every entry, a bar would only fight with those lines
    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if self.config.verbose || len == 0 {
            return None;
        }

        let progress_bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        Some(progress_bar)
    }

    fn log_summary(&self, report: &PipelineReport, manifest_path: Option<&PathBuf>, elapsed: Duration) {
        for failure in report.extraction_errors() {
            error!("{}", failure);
        }

        info!(
            "Extracted {}/{} clips in {}",
            report.succeeded(),
            report.attempted + report.skipped,
            Self::format_duration(elapsed)
        );

        if let Some(path) = manifest_path {
            info!("Manifest: {}", path.display());
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
