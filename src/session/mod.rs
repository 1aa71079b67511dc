//! Playback session orchestration.
//!
//! The session is the long-lived heart of the application: a single actor
//! that owns the `Idle / Speaking / Exiting` machine, loops utterances
//! through the speech engine, counts completed plays, and publishes
//! snapshots for the foreground controller and the notification surface.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sayagain::config::SpeechConfig;
//! use sayagain::notify::{LogSurface, NotificationController};
//! use sayagain::session::PlaybackSession;
//! use sayagain::speech::{event_channel, SimulatedSpeechEngine, SpeechEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (sink, events) = event_channel();
//!     let engine: Arc<dyn SpeechEngine> =
//!         Arc::new(SimulatedSpeechEngine::new(sink, &SpeechConfig::default()));
//!     let notifier = NotificationController::new(Box::new(LogSurface));
//!
//!     let (session, handle) = PlaybackSession::new(engine, notifier);
//!     tokio::spawn(session.run(events));
//!
//!     handle.submit("hello world").unwrap();
//!     // ... the text now repeats until handle.stop() or handle.exit()
//! }
//! ```

pub mod playback;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use playback::{PlaybackSession, SessionCommand, SessionError, SessionHandle};
pub use state::{SessionSnapshot, SessionState};
