//! Cloud translation backend.
//!
//! [`HttpCloudClient`] speaks the Google-Translate-v2 wire format: a form
//! POST with `q` / `source` / `target` fields answered by
//! `data.translations[0].translatedText`. The base URL comes from
//! configuration so tests and self-hosted deployments can point anywhere.
//!
//! [`CloudTranslator`] adapts one `(source, target)` pair of a shared cloud
//! client to the [`Translator`] handle interface the selector caches.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CloudConfig;

use super::backend::{TranslateError, Translator};

// ---------------------------------------------------------------------------
// CloudTranslateClient trait
// ---------------------------------------------------------------------------

/// Wire-level cloud translation capability.
///
/// One request per call; no retries, no streaming. A non-success response
/// or unusable payload surfaces as [`TranslateError::Backend`] carrying the
/// response status.
#[async_trait]
pub trait CloudTranslateClient: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// HttpCloudClient
// ---------------------------------------------------------------------------

/// `reqwest`-based [`CloudTranslateClient`].
pub struct HttpCloudClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCloudClient {
    /// Build a client from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is the last-resort fallback
    /// if the builder fails (should never happen in practice).
    pub fn from_config(config: &CloudConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl CloudTranslateClient for HttpCloudClient {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let form = [
            ("q", text),
            ("source", source),
            ("target", target),
            ("format", "text"),
        ];

        let response = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::Request(e.to_string()))?;

        parse_translate_payload(status, &body)
    }
}

/// Extract the translated text from a v2-shaped response body.
///
/// A non-2xx status or a payload without `data.translations[0].translatedText`
/// is a [`TranslateError::Backend`] carrying the response status.
fn parse_translate_payload(status: u16, body: &str) -> Result<String, TranslateError> {
    if !(200..300).contains(&status) {
        return Err(TranslateError::Backend {
            status,
            message: snippet(body),
        });
    }

    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|_| TranslateError::Backend {
            status,
            message: "response is not valid JSON".into(),
        })?;

    json["data"]["translations"][0]["translatedText"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or(TranslateError::Backend {
            status,
            message: "no translation in response".into(),
        })
}

/// First line of a response body, bounded, for error messages.
fn snippet(body: &str) -> String {
    let line = body.lines().next().unwrap_or("");
    line.chars().take(120).collect()
}

// ---------------------------------------------------------------------------
// CloudTranslator
// ---------------------------------------------------------------------------

/// A cached [`Translator`] handle binding one language pair to a shared
/// cloud client.
pub(crate) struct CloudTranslator {
    api: Arc<dyn CloudTranslateClient>,
    source: String,
    target: String,
}

impl CloudTranslator {
    pub(crate) fn new(api: Arc<dyn CloudTranslateClient>, source: &str, target: &str) -> Self {
        Self {
            api,
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[async_trait]
impl Translator for CloudTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.api.translate(text, &self.source, &self.target).await
    }

    async fn ensure_model_ready(&self) -> Result<(), TranslateError> {
        // Cloud translation has no local model.
        Ok(())
    }

    fn close(&mut self) {
        log::debug!(
            "cloud translator {}->{} released",
            self.source,
            self.target
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
