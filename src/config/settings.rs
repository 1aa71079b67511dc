//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::translate::BackendKind;

use super::AppPaths;

// ---------------------------------------------------------------------------
// CloudConfig
// ---------------------------------------------------------------------------

/// Settings for the cloud translation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Base URL of the translation endpoint.
    pub base_url: String,
    /// API key appended to every request. Empty disables the cloud backend.
    pub api_key: String,
    /// Maximum seconds to wait for a response before the request fails.
    pub timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translation.googleapis.com/language/translate/v2".into(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech playback pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Fixed lead-in per utterance in milliseconds.
    pub base_millis: u64,
    /// Additional milliseconds of speaking time per character.
    pub millis_per_char: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_millis: 250,
            millis_per_char: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// ForegroundState
// ---------------------------------------------------------------------------

/// Foreground editor state persisted across launches.
///
/// Written when the foreground controller goes to the background or exits,
/// read once at startup so the user finds their last session as they left it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForegroundState {
    /// Last text in the input editor.
    pub editor_text: String,
    /// Last translation result shown.
    pub result_text: String,
    /// Whether `result_text` is a valid translation of `editor_text`.
    pub translated: bool,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use sayagain::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Selected translation backend.
    pub backend: BackendKind,
    /// Cloud backend settings.
    pub cloud: CloudConfig,
    /// Speech pacing settings.
    pub speech: SpeechConfig,
    /// Persisted foreground editor state.
    pub state: ForegroundState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::OnDevice,
            cloud: CloudConfig::default(),
            speech: SpeechConfig::default(),
            state: ForegroundState::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
