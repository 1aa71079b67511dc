//! Translation backends and selection.
//!
//! # Architecture
//!
//! ```text
//! TranslationSelector ── (source, target, backend) ──▶ handle cache
//!        │
//!        ├─ OnDevice ──▶ TranslatorFactory ──▶ dyn Translator
//!        │                    (model readiness via ModelStore)
//!        │
//!        └─ Cloud ─────▶ CloudTranslator ──▶ dyn CloudTranslateClient
//!                                               (HttpCloudClient / reqwest)
//! ```
//!
//! The selector is the only owner of opened translator handles; it releases
//! each exactly once at shutdown. A handle is cached only after its first
//! successful translation, so failures never poison the cache.

pub mod backend;
pub mod cloud;
pub mod model;
pub mod selector;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{BackendKind, TranslateError, Translator};
pub use cloud::{CloudTranslateClient, HttpCloudClient};
pub use model::{find_model, ModelInfo, ModelStore, PAIR_MODELS};
pub use selector::{TranslationSelector, TranslatorFactory};
