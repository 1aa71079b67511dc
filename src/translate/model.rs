//! Language-model registry and on-disk store for the on-device backend.
//!
//! [`PAIR_MODELS`] lists the model file for each supported language pair.
//! [`ModelStore`] resolves where a model lives on disk, checks whether it is
//! present, and downloads it when it is not. On-device translator
//! implementations call [`ModelStore::ensure`] from their
//! `ensure_model_ready`; a failed download surfaces as
//! [`TranslateError::ModelUnavailable`].

use std::path::PathBuf;

use super::backend::TranslateError;

// ---------------------------------------------------------------------------
// ModelInfo
// ---------------------------------------------------------------------------

/// Static metadata for a single language-pair model file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Source language code.
    pub source: &'static str,
    /// Target language code.
    pub target: &'static str,
    /// File name under the models directory.
    pub file_name: &'static str,
    /// Approximate file size in megabytes.
    pub file_size_mb: u64,
    /// Download URL for the model file.
    pub source_url: &'static str,
}

/// Translation models for the supported language pairs (Helsinki-NLP
/// OPUS-MT exports).
pub const PAIR_MODELS: &[ModelInfo] = &[
    ModelInfo {
        source: "zh-CN",
        target: "en",
        file_name: "opus-mt-zh-en.bin",
        file_size_mb: 295,
        source_url:
            "https://huggingface.co/Helsinki-NLP/opus-mt-zh-en/resolve/main/pytorch_model.bin",
    },
    ModelInfo {
        source: "en",
        target: "zh-CN",
        file_name: "opus-mt-en-zh.bin",
        file_size_mb: 298,
        source_url:
            "https://huggingface.co/Helsinki-NLP/opus-mt-en-zh/resolve/main/pytorch_model.bin",
    },
];

/// Find the model for a language pair.
pub fn find_model(source: &str, target: &str) -> Option<&'static ModelInfo> {
    PAIR_MODELS
        .iter()
        .find(|m| m.source == source && m.target == target)
}

// ---------------------------------------------------------------------------
// ModelStore
// ---------------------------------------------------------------------------

/// Resolves, checks and downloads model files under one directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Full path to the file for the given model.
    pub fn model_path(&self, model: &ModelInfo) -> PathBuf {
        self.models_dir.join(model.file_name)
    }

    /// Returns `true` if the model file exists on disk.
    pub fn is_available(&self, model: &ModelInfo) -> bool {
        self.model_path(model).exists()
    }

    /// Make sure the model file is present, downloading it if absent.
    ///
    /// Returns the on-disk path. Any failure along the way (network, HTTP
    /// status, filesystem) surfaces as
    /// [`TranslateError::ModelUnavailable`] and leaves no partial file, so
    /// the next call retries cleanly.
    pub async fn ensure(&self, model: &ModelInfo) -> Result<PathBuf, TranslateError> {
        let path = self.model_path(model);
        if path.exists() {
            return Ok(path);
        }

        log::info!(
            "model store: downloading {} (~{} MB) from {}",
            model.file_name,
            model.file_size_mb,
            model.source_url
        );

        let response = reqwest::get(model.source_url)
            .await
            .map_err(|e| TranslateError::ModelUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::ModelUnavailable(format!(
                "download of {} failed with status {}",
                model.file_name,
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TranslateError::ModelUnavailable(e.to_string()))?;

        std::fs::create_dir_all(&self.models_dir)
            .map_err(|e| TranslateError::ModelUnavailable(e.to_string()))?;

        // Write to a temp name first so a crash never leaves a truncated
        // model behind.
        let tmp = path.with_extension("part");
        std::fs::write(&tmp, &bytes)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                TranslateError::ModelUnavailable(e.to_string())
            })?;

        log::info!("model store: {} ready", path.display());
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
