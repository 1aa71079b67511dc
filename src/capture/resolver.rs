//! Ordered capture-source resolution.
//!
//! Several external OCR providers *might* be installed; exactly one should
//! be used. Candidates are kept in priority order and probed lazily: the
//! first one whose [`CaptureProvider::is_resolvable`] answers `true` wins
//! and the scan stops, so a lower-priority candidate is never probed once a
//! higher-priority one resolves. The order is part of the contract; it must
//! not be reordered or parallelized, because a preferred provider must
//! always shadow the fallbacks.

use thiserror::Error;

// ---------------------------------------------------------------------------
// CaptureError / CaptureOutcome
// ---------------------------------------------------------------------------

/// Errors surfaced by capture resolution and launching.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    /// No candidate resolved. `install_hint` points at where to get the
    /// preferred provider so the caller can offer installation before
    /// giving up.
    #[error("no capture source available")]
    NoneAvailable { install_hint: Option<String> },

    /// A resolved provider failed to launch or run.
    #[error("capture launch failed: {0}")]
    Launch(String),
}

/// What a launched capture provider produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Text was recognized.
    Text(String),
    /// The user dismissed the capture without producing text.
    Cancelled,
}

// ---------------------------------------------------------------------------
// CaptureProvider / CaptureCandidate
// ---------------------------------------------------------------------------

/// One external application or capability that might satisfy a capture
/// request.
pub trait CaptureProvider: Send + Sync {
    /// Is some handler registered for this request right now?
    ///
    /// Called lazily and only until the first candidate answers `true`.
    fn is_resolvable(&self) -> bool;

    /// Launch the provider and wait for its result. Blocking; callers on an
    /// async runtime wrap this in `spawn_blocking`.
    fn launch(&self) -> Result<CaptureOutcome, CaptureError>;
}

/// A prioritized entry in the capture-source list.
pub struct CaptureCandidate {
    /// Stable identifier used in logs and status messages.
    pub id: &'static str,
    /// Where to obtain this provider when it is not installed.
    pub install_url: Option<String>,
    pub provider: Box<dyn CaptureProvider>,
}

impl CaptureCandidate {
    pub fn new(
        id: &'static str,
        install_url: Option<String>,
        provider: Box<dyn CaptureProvider>,
    ) -> Self {
        Self {
            id,
            install_url,
            provider,
        }
    }
}

impl std::fmt::Debug for CaptureCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureCandidate")
            .field("id", &self.id)
            .field("install_url", &self.install_url)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// CaptureResolver
// ---------------------------------------------------------------------------

/// Evaluates an ordered candidate list and launches the first usable one.
pub struct CaptureResolver {
    candidates: Vec<CaptureCandidate>,
}

impl CaptureResolver {
    pub fn new(candidates: Vec<CaptureCandidate>) -> Self {
        Self { candidates }
    }

    /// The first resolvable candidate, probing strictly in list order.
    ///
    /// Candidates after the first match are never probed. When none
    /// resolves, the error carries the preferred (first) candidate's
    /// install hint.
    pub fn resolve(&self) -> Result<&CaptureCandidate, CaptureError> {
        for candidate in &self.candidates {
            if candidate.provider.is_resolvable() {
                log::debug!("capture: resolved source '{}'", candidate.id);
                return Ok(candidate);
            }
            log::trace!("capture: source '{}' not resolvable", candidate.id);
        }

        Err(CaptureError::NoneAvailable {
            install_hint: self
                .candidates
                .first()
                .and_then(|c| c.install_url.clone()),
        })
    }

    /// Resolve and launch in one step.
    pub fn capture(&self) -> Result<CaptureOutcome, CaptureError> {
        self.resolve()?.provider.launch()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
