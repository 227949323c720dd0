/*!
 * Mock decoder for testing.
 *
 * - `MockDecoder::working()` - every invocation succeeds and writes a stub clip
 * - `MockDecoder::failing(code)` - every invocation exits with `code`
 * - `MockDecoder::unlaunchable()` - the tool can never be started
 * - `.fail_on(filename, code)` - only invocations writing `filename` fail
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{Decoder, DecoderInvocation, ExtractionOutcome};

/// Default behavior of the mock decoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Exit zero and write a stub file at the output path
    Working,
    /// Exit with the given non-zero code
    Failing { code: i32 },
    /// Fail to launch
    Unlaunchable,
}

#[derive(Debug, Default)]
struct MockState {
    invocations: Mutex<Vec<DecoderInvocation>>,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

/// Mock decoder; clones share recorded state
#[derive(Debug, Clone)]
pub struct MockDecoder {
    behavior: MockBehavior,
    failures: HashMap<String, i32>,
    latency: Duration,
    state: Arc<MockState>,
}

impl MockDecoder {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failures: HashMap::new(),
            latency: Duration::ZERO,
            state: Arc::new(MockState::default()),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing(code: i32) -> Self {
        Self::new(MockBehavior::Failing { code })
    }

    pub fn unlaunchable() -> Self {
        Self::new(MockBehavior::Unlaunchable)
    }

    /// Invocations whose output filename equals `filename` exit with `code`
    pub fn fail_on(mut self, filename: impl Into<String>, code: i32) -> Self {
        self.failures.insert(filename.into(), code);
        self
    }

    /// Simulate a decoder that takes `latency` per invocation
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every invocation received so far, in call order
    pub fn invocations(&self) -> Vec<DecoderInvocation> {
        self.state.invocations.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.invocations.lock().len()
    }

    /// Highest number of invocations that were running at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.state.peak_active.load(Ordering::SeqCst)
    }

    fn forced_failure(&self, invocation: &DecoderInvocation) -> Option<i32> {
        let filename = invocation.output.file_name()?.to_string_lossy();
        self.failures.get(filename.as_ref()).copied()
    }
}

#[async_trait]
impl Decoder for MockDecoder {
    async fn decode(&self, invocation: &DecoderInvocation) -> ExtractionOutcome {
        self.state.invocations.lock().push(invocation.clone());

        let active = self.state.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak_active.fetch_max(active, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let outcome = match (self.forced_failure(invocation), self.behavior) {
            (Some(code), _) | (None, MockBehavior::Failing { code }) => ExtractionOutcome::Failed {
                code: Some(code),
                detail: format!("mock failure writing {}", invocation.output.display()),
            },
            (None, MockBehavior::Unlaunchable) => ExtractionOutcome::Errored {
                cause: "failed to launch mock-decoder: No such file or directory (os error 2)".to_string(),
            },
            (None, MockBehavior::Working) => {
                match tokio::fs::write(&invocation.output, b"RIFF").await {
                    Ok(()) => ExtractionOutcome::Succeeded,
                    Err(e) => ExtractionOutcome::Failed {
                        code: Some(1),
                        detail: format!("{}: {}", invocation.output.display(), e),
                    },
                }
            }
        };

        self.state.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
