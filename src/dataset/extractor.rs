/*!
 * Per-entry clip extraction.
 *
 * One decoder invocation per subtitle entry. A successful invocation is
 * followed by a settle delay before the extractor reports completion, which
 * spaces out back-to-back reads of the same source file.
 */

use std::path::Path;
use std::time::Duration;

use crate::decoder::{Decoder, DecoderInvocation, ExtractionOutcome};
use crate::subtitle_processor::SubtitleEntry;

use super::naming::AudioClipDescriptor;
use super::timecode::to_decoder_timestamp;

/// Default pause after a successful extraction
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(400);

/// Cuts clips through a decoder backend
#[derive(Debug, Clone)]
pub struct SegmentExtractor<D> {
    decoder: D,
    settle_delay: Duration,
}

impl<D: Decoder> SegmentExtractor<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Decoder invocation for one entry
    pub fn invocation(entry: &SubtitleEntry, clip: &AudioClipDescriptor, source: &Path) -> DecoderInvocation {
        DecoderInvocation {
            input: source.to_path_buf(),
            start: to_decoder_timestamp(&entry.start),
            end: to_decoder_timestamp(&entry.end),
            output: clip.path.clone(),
        }
    }

    /// Extract one clip and wait out the settle delay on success.
    ///
    /// Partial output left by a failed run is not removed.
    pub async fn extract(&self, entry: &SubtitleEntry, clip: &AudioClipDescriptor, source: &Path) -> ExtractionOutcome {
        let invocation = Self::invocation(entry, clip, source);
        let outcome = self.decoder.decode(&invocation).await;

        if outcome.is_success() && !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        outcome
    }
}
