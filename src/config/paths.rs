//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\sayagain\
//!   macOS:   ~/Library/Application Support/sayagain/
//!   Linux:   ~/.config/sayagain/
//!
//! Data dir (translation models, export logs):
//!   Windows: %LOCALAPPDATA%\sayagain\
//!   macOS:   ~/Library/Application Support/sayagain/
//!   Linux:   ~/.local/share/sayagain/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for downloaded translation model files.
    pub models_dir: PathBuf,
    /// Directory for exported translation log files.
    pub exports_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "sayagain";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let models_dir = data_dir.join("models");
        let exports_dir = data_dir.join("translations");

        Self {
            config_dir,
            settings_file,
            models_dir,
            exports_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
