//! Translator capability trait, backend selection enum and error type.
//!
//! A [`Translator`] is one opened handle for one language pair on one
//! backend. Handles are created lazily and owned exclusively by the
//! selector; nothing else may hold or close them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// BackendKind
// ---------------------------------------------------------------------------

/// Which translation provider services a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// On-device model-based translation; works offline once the language
    /// model is downloaded.
    OnDevice,
    /// Cloud HTTP translation API.
    Cloud,
}

impl BackendKind {
    /// A short human-readable label suitable for status display.
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::OnDevice => "on-device",
            BackendKind::Cloud => "cloud",
        }
    }
}

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors surfaced by translation backends and the selector.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// The input text was blank. Rejected before any backend is touched.
    #[error("nothing to translate")]
    InvalidInput,

    /// The language model for the requested pair is missing and could not
    /// be downloaded. Retryable: a later call re-attempts the download.
    #[error("translation model unavailable: {0}")]
    ModelUnavailable(String),

    /// The backend answered with a non-success status or an unusable
    /// payload. Surfaced verbatim, never retried automatically.
    #[error("translation backend failed (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// The request never produced a response (connection, DNS, timeout).
    #[error("translation request failed: {0}")]
    Request(String),

    /// The selector has been shut down; all handles are released.
    #[error("translation selector is shut down")]
    SelectorClosed,
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// One opened translation handle for a fixed language pair.
///
/// Implementations must be `Send + Sync`; the selector stores them behind
/// `Box<dyn Translator>` and calls [`close`](Self::close) exactly once when
/// it shuts down.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` for this handle's language pair.
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;

    /// Make sure the handle is ready to translate, downloading the language
    /// model first if it is absent. Cheap when already ready.
    async fn ensure_model_ready(&self) -> Result<(), TranslateError>;

    /// Release the handle's resources. Called exactly once.
    fn close(&mut self);
}

// Compile-time assertion: Box<dyn Translator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Translator>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
