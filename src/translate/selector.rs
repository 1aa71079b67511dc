//! Translator selection and handle caching.
//!
//! [`TranslationSelector`] owns every opened translator handle, keyed by
//! `(source, target, backend)`. Handles are created lazily on first use and
//! cached only after they prove usable: a failed model download or a failed
//! first request leaves the cache untouched, so retrying is as simple as
//! calling [`translate`](TranslationSelector::translate) again.
//!
//! Shutdown releases every handle exactly once; the selector's `Drop` also
//! shuts down, so no handle can outlive it.

use std::collections::HashMap;
use std::sync::Arc;

use super::backend::{BackendKind, TranslateError, Translator};
use super::cloud::{CloudTranslateClient, CloudTranslator};

// ---------------------------------------------------------------------------
// TranslatorFactory
// ---------------------------------------------------------------------------

/// Creates on-device translator handles for a language pair.
///
/// Creation itself is cheap; the expensive part (the language model) is
/// pulled in by the handle's `ensure_model_ready`.
pub trait TranslatorFactory: Send + Sync {
    fn create(&self, source: &str, target: &str) -> Box<dyn Translator>;
}

// ---------------------------------------------------------------------------
// TranslationSelector
// ---------------------------------------------------------------------------

type CacheKey = (String, String, BackendKind);

/// Chooses and caches a translator per language pair and backend.
pub struct TranslationSelector {
    factory: Arc<dyn TranslatorFactory>,
    cloud: Arc<dyn CloudTranslateClient>,
    cache: HashMap<CacheKey, Box<dyn Translator>>,
    closed: bool,
}

impl TranslationSelector {
    pub fn new(factory: Arc<dyn TranslatorFactory>, cloud: Arc<dyn CloudTranslateClient>) -> Self {
        Self {
            factory,
            cloud,
            cache: HashMap::new(),
            closed: false,
        }
    }

    /// Translate `text` from `source` to `target` on the given backend.
    ///
    /// Reuses the cached handle for the key when one exists; otherwise
    /// opens one, proves it usable (model readiness, then the translation
    /// itself) and caches it. On any failure the candidate handle is closed
    /// and discarded, and the error is surfaced verbatim.
    pub async fn translate(
        &mut self,
        text: &str,
        source: &str,
        target: &str,
        backend: BackendKind,
    ) -> Result<String, TranslateError> {
        if self.closed {
            return Err(TranslateError::SelectorClosed);
        }
        if text.trim().is_empty() {
            return Err(TranslateError::InvalidInput);
        }

        let key = (source.to_string(), target.to_string(), backend);

        if let Some(handle) = self.cache.get(&key) {
            // Readiness is re-checked per call: the model can disappear
            // from disk between calls and must then be re-downloaded.
            handle.ensure_model_ready().await?;
            return handle.translate(text).await;
        }

        log::debug!(
            "selector: opening {} translator for {source} -> {target}",
            backend.label()
        );

        let mut handle: Box<dyn Translator> = match backend {
            BackendKind::OnDevice => self.factory.create(source, target),
            BackendKind::Cloud => {
                Box::new(CloudTranslator::new(Arc::clone(&self.cloud), source, target))
            }
        };

        if let Err(e) = handle.ensure_model_ready().await {
            handle.close();
            return Err(e);
        }

        match handle.translate(text).await {
            Ok(translated) => {
                self.cache.insert(key, handle);
                Ok(translated)
            }
            Err(e) => {
                handle.close();
                Err(e)
            }
        }
    }

    /// Number of live cached handles.
    pub fn cached_handles(&self) -> usize {
        self.cache.len()
    }

    /// Release every cached handle and refuse further translation.
    ///
    /// Idempotent; each handle is closed exactly once no matter how often
    /// this is called.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        for ((source, target, backend), mut handle) in self.cache.drain() {
            log::debug!(
                "selector: releasing {} handle {source} -> {target}",
                backend.label()
            );
            handle.close();
        }
    }
}

impl Drop for TranslationSelector {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// On-device translator stub with observable close behaviour.
    struct StubTranslator {
        reply: String,
        ready: Result<(), TranslateError>,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate(&self, text: &str) -> Result<String, TranslateError> {
            Ok(format!("{}:{}", self.reply, text))
        }

        async fn ensure_model_ready(&self) -> Result<(), TranslateError> {
            self.ready.clone()
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Factory that counts creations and can fail readiness for the first
    /// N handles it creates.
    struct CountingFactory {
        creations: AtomicUsize,
        fail_ready_first: usize,
        closes: Arc<AtomicUsize>,
    }

    impl CountingFactory {
        fn new() -> Self {
            Self::failing_first(0)
        }

        fn failing_first(n: usize) -> Self {
            Self {
                creations: AtomicUsize::new(0),
                fail_ready_first: n,
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn created(&self) -> usize {
            self.creations.load(Ordering::SeqCst)
        }
    }

    impl TranslatorFactory for CountingFactory {
        fn create(&self, source: &str, target: &str) -> Box<dyn Translator> {
            let nth = self.creations.fetch_add(1, Ordering::SeqCst);
            let ready = if nth < self.fail_ready_first {
                Err(TranslateError::ModelUnavailable("download failed".into()))
            } else {
                Ok(())
            };
            Box::new(StubTranslator {
                reply: format!("{source}->{target}"),
                ready,
                closes: Arc::clone(&self.closes),
            })
        }
    }

    /// Cloud client that replays a scripted response.
    struct ScriptedCloud {
        responses: Mutex<Vec<Result<String, TranslateError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedCloud {
        fn ok(text: &str) -> Self {
            Self::with(vec![Ok(text.to_string())])
        }

        fn with(mut responses: Vec<Result<String, TranslateError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CloudTranslateClient for ScriptedCloud {
        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("default".into()))
        }
    }

    fn make_selector(
        factory: Arc<CountingFactory>,
        cloud: Arc<ScriptedCloud>,
    ) -> TranslationSelector {
        TranslationSelector::new(factory, cloud)
    }

    // -----------------------------------------------------------------------
    // Cache behaviour
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn same_key_reuses_the_cached_handle() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("unused"));
        let mut selector = make_selector(Arc::clone(&factory), cloud);

        let a = selector
            .translate("你好", "zh-CN", "en", BackendKind::OnDevice)
            .await
            .unwrap();
        let b = selector
            .translate("再見", "zh-CN", "en", BackendKind::OnDevice)
            .await
            .unwrap();

        assert_eq!(a, "zh-CN->en:你好");
        assert_eq!(b, "zh-CN->en:再見");
        assert_eq!(factory.created(), 1);
        assert_eq!(selector.cached_handles(), 1);
    }

    #[tokio::test]
    async fn different_key_creates_an_independent_handle() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("unused"));
        let mut selector = make_selector(Arc::clone(&factory), cloud);

        selector
            .translate("hi", "zh-CN", "en", BackendKind::OnDevice)
            .await
            .unwrap();
        selector
            .translate("hi", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap();

        assert_eq!(factory.created(), 2);
        assert_eq!(selector.cached_handles(), 2);
    }

    #[tokio::test]
    async fn same_pair_on_different_backends_are_separate_entries() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("云"));
        let mut selector = make_selector(Arc::clone(&factory), Arc::clone(&cloud));

        selector
            .translate("hi", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap();
        let via_cloud = selector
            .translate("hi", "en", "zh-CN", BackendKind::Cloud)
            .await
            .unwrap();

        assert_eq!(via_cloud, "云");
        assert_eq!(selector.cached_handles(), 2);
    }

    // -----------------------------------------------------------------------
    // Failure paths
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn blank_input_is_rejected_before_any_handle_is_opened() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("unused"));
        let mut selector = make_selector(Arc::clone(&factory), cloud);

        let err = selector
            .translate("  ", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::InvalidInput));
        assert_eq!(factory.created(), 0);
        assert_eq!(selector.cached_handles(), 0);
    }

    #[tokio::test]
    async fn model_download_failure_creates_no_cache_entry() {
        let factory = Arc::new(CountingFactory::failing_first(1));
        let cloud = Arc::new(ScriptedCloud::ok("unused"));
        let mut selector = make_selector(Arc::clone(&factory), cloud);

        let err = selector
            .translate("hi", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::ModelUnavailable(_)));
        assert_eq!(selector.cached_handles(), 0);
        // The failed candidate handle was still released.
        assert_eq!(factory.closes.load(Ordering::SeqCst), 1);

        // Retry succeeds and caches exactly one handle.
        let out = selector
            .translate("hi", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap();
        assert_eq!(out, "en->zh-CN:hi");
        assert_eq!(factory.created(), 2);
        assert_eq!(selector.cached_handles(), 1);
    }

    #[tokio::test]
    async fn cloud_500_surfaces_backend_error_and_caches_nothing() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::with(vec![Err(TranslateError::Backend {
            status: 500,
            message: "internal error".into(),
        })]));
        let mut selector = make_selector(factory, cloud);

        let err = selector
            .translate("hi", "en", "zh-CN", BackendKind::Cloud)
            .await
            .unwrap_err();

        match err {
            TranslateError::Backend { status, .. } => assert_eq!(status, 500),
            other => panic!("expected Backend, got {other:?}"),
        }
        assert_eq!(selector.cached_handles(), 0);
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn shutdown_releases_every_handle_exactly_once() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("unused"));
        let mut selector = make_selector(Arc::clone(&factory), cloud);

        selector
            .translate("hi", "zh-CN", "en", BackendKind::OnDevice)
            .await
            .unwrap();
        selector
            .translate("hi", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap();

        selector.shutdown();
        assert_eq!(factory.closes.load(Ordering::SeqCst), 2);

        // A second shutdown must not close anything again.
        selector.shutdown();
        assert_eq!(factory.closes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn translate_after_shutdown_is_an_error() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("unused"));
        let mut selector = make_selector(factory, cloud);

        selector.shutdown();

        let err = selector
            .translate("hi", "en", "zh-CN", BackendKind::OnDevice)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::SelectorClosed));
    }

    #[tokio::test]
    async fn drop_releases_handles() {
        let factory = Arc::new(CountingFactory::new());
        let cloud = Arc::new(ScriptedCloud::ok("unused"));

        {
            let mut selector = make_selector(Arc::clone(&factory), cloud);
            selector
                .translate("hi", "zh-CN", "en", BackendKind::OnDevice)
                .await
                .unwrap();
        }

        assert_eq!(factory.closes.load(Ordering::SeqCst), 1);
    }
}
