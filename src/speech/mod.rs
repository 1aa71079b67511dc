//! Speech synthesis interface.
//!
//! The playback session drives a [`SpeechEngine`] in fire-and-forget style:
//! `speak` and `stop` return immediately, and the engine reports utterance
//! lifecycle ([`SpeechEvent::Started`] / [`Done`](SpeechEvent::Done) /
//! [`Error`](SpeechEvent::Error)) through an [`EventSink`] wired into the
//! session's message queue.
//!
//! [`SimulatedSpeechEngine`] is a reference implementation that models
//! synthesis timing without producing audio; real deployments substitute an
//! adapter over the platform synthesizer.

pub mod engine;
pub mod simulated;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use engine::{event_channel, EventSink, SpeechEngine, SpeechEvent};
pub use simulated::SimulatedSpeechEngine;

// test-only re-export so the session test module can import ScriptedEngine
// without reaching into speech::engine.
#[cfg(test)]
pub use engine::ScriptedEngine;
