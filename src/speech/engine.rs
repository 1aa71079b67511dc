//! Core speech engine trait and lifecycle events.
//!
//! # Overview
//!
//! [`SpeechEngine`] is the interface the playback session drives. It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SpeechEngine>`.
//!
//! Speaking is fire-and-forget: `speak` returns immediately and the engine
//! reports progress by emitting [`SpeechEvent`]s through an [`EventSink`].
//! The sink feeds the session's message queue, so engine callbacks arriving
//! on the engine's own worker are serialized with user commands instead of
//! racing them.
//!
//! [`ScriptedEngine`] (available under `#[cfg(test)]`) records every call so
//! state-machine tests can drive events by hand.

use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// SpeechEvent
// ---------------------------------------------------------------------------

/// Lifecycle events emitted by a speech engine.
///
/// Every event carries the utterance id the engine was given in
/// [`SpeechEngine::speak`]; the session uses it to discard callbacks from
/// utterances it has since cancelled or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The engine began speaking the utterance.
    Started { utterance_id: String },
    /// The engine finished the utterance normally.
    Done { utterance_id: String },
    /// The engine failed while speaking the utterance.
    Error {
        utterance_id: String,
        message: String,
    },
}

impl SpeechEvent {
    /// The utterance id this event belongs to.
    pub fn utterance_id(&self) -> &str {
        match self {
            SpeechEvent::Started { utterance_id }
            | SpeechEvent::Done { utterance_id }
            | SpeechEvent::Error { utterance_id, .. } => utterance_id,
        }
    }
}

// ---------------------------------------------------------------------------
// EventSink
// ---------------------------------------------------------------------------

/// Sending half of an engine event channel.
///
/// Cheap to clone; engines hold one and call [`emit`](Self::emit) from any
/// thread. Emitting never blocks; events for a session that has terminated
/// are silently dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl EventSink {
    pub fn emit(&self, event: SpeechEvent) {
        // A closed receiver means the session is gone; nothing to notify.
        let _ = self.tx.send(event);
    }
}

/// Create the event channel connecting an engine to a playback session.
///
/// The [`EventSink`] goes to the engine, the receiver to
/// `PlaybackSession::run`.
pub fn event_channel() -> (EventSink, mpsc::UnboundedReceiver<SpeechEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, rx)
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to a speech synthesizer.
///
/// # Contract
///
/// - `speak` replaces whatever the engine is currently saying (flush
///   semantics) and returns without waiting; completion arrives as a
///   [`SpeechEvent::Done`] carrying `utterance_id`.
/// - `stop` cancels the in-flight utterance. A cancelled utterance must not
///   emit `Done`.
pub trait SpeechEngine: Send + Sync {
    /// Start speaking `text`, tagging all resulting events with
    /// `utterance_id`.
    fn speak(&self, text: &str, utterance_id: &str);

    /// Cancel the in-flight utterance, if any.
    fn stop(&self);
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// ScriptedEngine  (test-only)
// ---------------------------------------------------------------------------

/// A test double that records every `speak` and `stop` call and emits
/// nothing on its own; tests feed [`SpeechEvent`]s by hand to exercise the
/// session state machine deterministically.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedEngine {
    /// `(text, utterance_id)` pairs in call order.
    pub spoken: std::sync::Mutex<Vec<(String, String)>>,
    /// Number of `stop` calls.
    pub stops: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The utterance id of the most recent `speak` call.
    pub fn last_utterance_id(&self) -> Option<String> {
        self.spoken
            .lock()
            .unwrap()
            .last()
            .map(|(_, id)| id.clone())
    }

    pub fn speak_count(&self) -> usize {
        self.spoken.lock().unwrap().len()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl SpeechEngine for ScriptedEngine {
    fn speak(&self, text: &str, utterance_id: &str) {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), utterance_id.to_string()));
    }

    fn stop(&self) {
        self.stops
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_its_utterance_id() {
        let started = SpeechEvent::Started {
            utterance_id: "u1".into(),
        };
        let done = SpeechEvent::Done {
            utterance_id: "u2".into(),
        };
        let error = SpeechEvent::Error {
            utterance_id: "u3".into(),
            message: "boom".into(),
        };

        assert_eq!(started.utterance_id(), "u1");
        assert_eq!(done.utterance_id(), "u2");
        assert_eq!(error.utterance_id(), "u3");
    }

    #[tokio::test]
    async fn sink_delivers_events_in_order() {
        let (sink, mut rx) = event_channel();

        sink.emit(SpeechEvent::Started {
            utterance_id: "u1".into(),
        });
        sink.emit(SpeechEvent::Done {
            utterance_id: "u1".into(),
        });

        assert_eq!(rx.recv().await.unwrap().utterance_id(), "u1");
        assert!(matches!(rx.recv().await.unwrap(), SpeechEvent::Done { .. }));
    }

    #[test]
    fn emit_after_receiver_dropped_is_silent() {
        let (sink, rx) = event_channel();
        drop(rx);
        // Must not panic.
        sink.emit(SpeechEvent::Done {
            utterance_id: "u1".into(),
        });
    }

    #[test]
    fn scripted_engine_records_calls() {
        let engine = ScriptedEngine::new();
        engine.speak("hello", "u1");
        engine.speak("world", "u2");
        engine.stop();

        assert_eq!(engine.speak_count(), 2);
        assert_eq!(engine.stop_count(), 1);
        assert_eq!(engine.last_utterance_id().as_deref(), Some("u2"));
    }
}
