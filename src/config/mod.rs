//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings with the persisted foreground
//! editor state), `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, CloudConfig, ForegroundState, SpeechConfig};
