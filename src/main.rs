//! Demo foreground controller — line-oriented driver for the playback core.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Wire the speech event channel, the simulated speech engine and the
//!    notification controller into a [`PlaybackSession`]; spawn its event
//!    loop as the background task.
//! 4. Build the [`TranslationSelector`] (cloud client from config; the
//!    on-device factory degrades gracefully when no inference engine is
//!    bundled).
//! 5. Connect a [`SessionBridge`] to the background session.
//! 6. Read stdin line by line: plain text is translated and spoken on a
//!    loop; `:commands` control playback, capture and the notification.
//! 7. On exit, persist the foreground state and shut the selector down.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use sayagain::{
    bridge::{ServiceLauncher, SessionBridge, StartRequest},
    capture::{default_candidates, CaptureError, CaptureOutcome, CaptureResolver},
    config::AppConfig,
    export::TranslationLog,
    lang::{spoken_side, Direction},
    notify::{LogSurface, NotificationController},
    session::{PlaybackSession, SessionHandle},
    speech::{event_channel, SimulatedSpeechEngine, SpeechEngine},
    translate::{
        BackendKind, HttpCloudClient, TranslateError, TranslationSelector, Translator,
        TranslatorFactory,
    },
};

// ---------------------------------------------------------------------------
// LocalLauncher — in-process ServiceLauncher
// ---------------------------------------------------------------------------

/// Delivers start requests straight to the in-process background session.
///
/// A platform host would start a separate service here; in this demo the
/// background task already runs on the same runtime, so delivery is a
/// handle send.
struct LocalLauncher {
    handle: SessionHandle,
}

impl ServiceLauncher for LocalLauncher {
    fn start(&self, request: StartRequest) {
        let result = match request {
            StartRequest::Play { text } => self.handle.submit(&text),
            StartRequest::Stop => self.handle.stop(),
            StartRequest::Exit => self.handle.exit(),
            StartRequest::ShowNotification => self.handle.show_notification(),
            StartRequest::HideNotification => self.handle.hide_notification(),
        };
        if let Err(e) = result {
            log::warn!("launcher: start request not delivered: {e}");
        }
    }

    fn bind(&self) {
        // The session always exists in-process; the connection completes
        // immediately via SessionBridge::on_connected in main.
    }
}

// ---------------------------------------------------------------------------
// NoDeviceFactory — fallback on-device factory
// ---------------------------------------------------------------------------

/// Stand-in factory used when no on-device inference engine is bundled.
///
/// Handles it creates fail readiness with `ModelUnavailable`, so selecting
/// the on-device backend surfaces a clear error instead of crashing, and
/// the cloud backend keeps working.
struct NoDeviceFactory;

struct NoDeviceTranslator {
    pair: String,
}

#[async_trait::async_trait]
impl Translator for NoDeviceTranslator {
    async fn translate(&self, _text: &str) -> Result<String, TranslateError> {
        Err(TranslateError::ModelUnavailable(format!(
            "no on-device translation engine installed for {}",
            self.pair
        )))
    }

    async fn ensure_model_ready(&self) -> Result<(), TranslateError> {
        Err(TranslateError::ModelUnavailable(format!(
            "no on-device translation engine installed for {} (use the cloud backend)",
            self.pair
        )))
    }

    fn close(&mut self) {}
}

impl TranslatorFactory for NoDeviceFactory {
    fn create(&self, source: &str, target: &str) -> Box<dyn Translator> {
        Box::new(NoDeviceTranslator {
            pair: format!("{source}->{target}"),
        })
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("sayagain starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    if config.backend == BackendKind::OnDevice {
        log::warn!(
            "on-device backend selected but no inference engine is bundled; \
             translations will fail until the backend is switched to cloud"
        );
    }

    // 3. Background playback session
    let (sink, events) = event_channel();
    let engine: Arc<dyn SpeechEngine> =
        Arc::new(SimulatedSpeechEngine::new(sink, &config.speech));
    let notifier = NotificationController::new(Box::new(LogSurface));
    let (session, handle) = PlaybackSession::new(engine, notifier);
    let session_task = tokio::spawn(session.run(events));

    // 4. Translation selector
    let cloud = Arc::new(HttpCloudClient::from_config(&config.cloud));
    let mut selector = TranslationSelector::new(Arc::new(NoDeviceFactory), cloud);

    // 5. Bridge (connects immediately: the session is in-process)
    let launcher = Arc::new(LocalLauncher {
        handle: handle.clone(),
    });
    let mut bridge = SessionBridge::new(launcher);
    bridge.ensure_bound();
    bridge.on_connected(handle.clone());

    // Capture chain and export log
    let resolver = Arc::new(CaptureResolver::new(default_candidates()));
    let paths = sayagain::config::AppPaths::new();
    let export = TranslationLog::new(&paths.exports_dir);

    println!("type text to translate and speak; :t toggle, :s stop, :c capture,");
    println!(":n show notification, :h hide notification, :q quit");

    // Restore the last session's editor content.
    if !config.state.editor_text.is_empty() {
        println!("(restored input: {})", config.state.editor_text);
    }

    // 6. Command loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();

        match line.as_str() {
            "" => continue,
            ":q" | ":quit" | ":exit" => break,
            ":t" | ":toggle" => {
                if let Some(h) = bridge.handle() {
                    let _ = h.toggle();
                }
            }
            ":s" | ":stop" => {
                let _ = bridge.stop();
            }
            ":n" | ":notify" => {
                let _ = bridge.show_notification();
            }
            ":h" | ":hide" => {
                let _ = bridge.hide_notification();
            }
            ":c" | ":capture" => {
                let resolver = Arc::clone(&resolver);
                let captured = tokio::task::spawn_blocking(move || resolver.capture()).await?;
                match captured {
                    Ok(CaptureOutcome::Text(text)) => {
                        println!("captured: {text}");
                        translate_and_play(&mut selector, &mut config, &export, &bridge, &text)
                            .await;
                    }
                    Ok(CaptureOutcome::Cancelled) => println!("capture cancelled"),
                    Err(CaptureError::NoneAvailable { install_hint }) => match install_hint {
                        Some(url) => println!("no capture source installed; get one at {url}"),
                        None => println!("no capture source available"),
                    },
                    Err(e) => println!("capture failed: {e}"),
                }
            }
            text => {
                translate_and_play(&mut selector, &mut config, &export, &bridge, text).await;
            }
        }

        let snapshot = handle.snapshot();
        log::debug!(
            "session: {} (played {}x)",
            snapshot.state.label(),
            snapshot.play_count
        );
    }

    // 7. Shutdown: persist state, release translators, end the session.
    let _ = bridge.exit();
    selector.shutdown();

    if let Err(e) = config.save() {
        log::warn!("failed to save config: {e}");
    }

    let _ = session_task.await;
    log::info!("sayagain stopped");
    Ok(())
}

/// Translate `text`, export the pair, and hand the spoken side to the
/// background session.
async fn translate_and_play(
    selector: &mut TranslationSelector,
    config: &mut AppConfig,
    export: &TranslationLog,
    bridge: &SessionBridge,
    text: &str,
) {
    let direction = Direction::of(text);

    config.state.editor_text = text.to_string();
    config.state.translated = false;

    let translated = match selector
        .translate(text, direction.source(), direction.target(), config.backend)
        .await
    {
        Ok(t) => t,
        Err(e) => {
            println!("translation failed: {e}");
            return;
        }
    };

    println!("{translated}");

    config.state.result_text = translated.clone();
    config.state.translated = true;

    if let Err(e) = export.append(text, &translated) {
        log::warn!("could not export translation: {e}");
    }

    let spoken = spoken_side(direction, text, &translated);
    if let Err(e) = bridge.submit(spoken) {
        log::warn!("could not start playback: {e}");
    }
}
