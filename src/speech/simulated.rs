//! Timing-based speech engine for headless use.
//!
//! [`SimulatedSpeechEngine`] does not produce audio; it models a
//! synthesizer's timing by sleeping for a duration proportional to the text
//! length and then reporting completion. The demo binary uses it so the full
//! playback loop (including looped re-submission and stale-callback
//! handling) can be exercised on any machine, and integration tests use it
//! with short pacing for real end-to-end runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::SpeechConfig;

use super::engine::{EventSink, SpeechEngine, SpeechEvent};

/// Speech engine that simulates utterance timing.
///
/// `speak` spawns a timer task; `stop` (or a subsequent `speak`) advances a
/// generation counter so a superseded timer finds itself stale and emits no
/// `Done` event, matching the cancellation contract of a real synthesizer.
pub struct SimulatedSpeechEngine {
    sink: EventSink,
    base: Duration,
    per_char: Duration,
    generation: Arc<AtomicU64>,
}

impl SimulatedSpeechEngine {
    pub fn new(sink: EventSink, config: &SpeechConfig) -> Self {
        Self {
            sink,
            base: Duration::from_millis(config.base_millis),
            per_char: Duration::from_millis(config.millis_per_char),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn utterance_duration(&self, text: &str) -> Duration {
        self.base + self.per_char * text.chars().count() as u32
    }
}

impl SpeechEngine for SimulatedSpeechEngine {
    fn speak(&self, text: &str, utterance_id: &str) {
        // Flush semantics: the new utterance supersedes any in-flight one.
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let sink = self.sink.clone();
        let generation = Arc::clone(&self.generation);
        let duration = self.utterance_duration(text);
        let id = utterance_id.to_string();

        tokio::spawn(async move {
            sink.emit(SpeechEvent::Started {
                utterance_id: id.clone(),
            });

            tokio::time::sleep(duration).await;

            if generation.load(Ordering::SeqCst) == my_generation {
                sink.emit(SpeechEvent::Done { utterance_id: id });
            } else {
                log::trace!("simulated engine: utterance {id} cancelled mid-flight");
            }
        });
    }

    fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::engine::event_channel;

    fn fast_config() -> SpeechConfig {
        SpeechConfig {
            base_millis: 1,
            millis_per_char: 0,
        }
    }

    #[tokio::test]
    async fn completed_utterance_emits_started_then_done() {
        let (sink, mut rx) = event_channel();
        let engine = SimulatedSpeechEngine::new(sink, &fast_config());

        engine.speak("hi", "u1");

        assert_eq!(
            rx.recv().await.unwrap(),
            SpeechEvent::Started {
                utterance_id: "u1".into()
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SpeechEvent::Done {
                utterance_id: "u1".into()
            }
        );
    }

    #[tokio::test]
    async fn stopped_utterance_never_emits_done() {
        let (sink, mut rx) = event_channel();
        let engine = SimulatedSpeechEngine::new(sink, &fast_config());

        engine.speak("hi", "u1");
        engine.stop();

        // Started was emitted before the cancellation could take effect.
        assert!(matches!(
            rx.recv().await.unwrap(),
            SpeechEvent::Started { .. }
        ));

        // Give the timer task time to run out; no Done may arrive.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn new_speak_supersedes_in_flight_utterance() {
        let (sink, mut rx) = event_channel();
        let engine = SimulatedSpeechEngine::new(sink, &fast_config());

        engine.speak("first", "u1");
        engine.speak("second", "u2");

        tokio::time::sleep(Duration::from_millis(30)).await;

        let mut done_ids = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let SpeechEvent::Done { utterance_id } = event {
                done_ids.push(utterance_id);
            }
        }
        assert_eq!(done_ids, vec!["u2".to_string()]);
    }

    #[test]
    fn duration_scales_with_text_length() {
        let (sink, _rx) = event_channel();
        let engine = SimulatedSpeechEngine::new(
            sink,
            &SpeechConfig {
                base_millis: 100,
                millis_per_char: 10,
            },
        );

        assert_eq!(
            engine.utterance_duration("abcd"),
            Duration::from_millis(140)
        );
        // Counted in characters, not bytes.
        assert_eq!(engine.utterance_duration("你好"), Duration::from_millis(120));
    }
}
