//! Playback session actor — drives looped speech until explicitly stopped.
//!
//! [`PlaybackSession`] owns the state machine and consumes one serialized
//! stream of inputs: [`SessionCommand`]s from any number of
//! [`SessionHandle`] clones, and [`SpeechEvent`]s from the engine's worker.
//! Because a single task applies them in arrival order, no transition ever
//! observes a half-applied peer.
//!
//! # Looped playback
//!
//! ```text
//! Submit(text) ──▶ speak(text, u1)
//!                    Done(u1) ──▶ play_count += 1, speak(text, u2)
//!                    Done(u2) ──▶ play_count += 1, speak(text, u3)
//!                    ...                       (until Stop or Exit)
//! ```
//!
//! Every `speak` mints a fresh utterance token. A completion whose token is
//! not the session's current one belongs to an utterance that was cancelled
//! or replaced; it is discarded without touching state. That discard is the
//! expected resolution of the submit/complete race, not a failure.
//!
//! The session outlives its foreground controller: dropping every handle
//! closes the command channel but the loop keeps consuming engine events,
//! so an audible session keeps playing until `exit` or a fatal engine
//! error.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::notify::NotificationController;
use crate::speech::{SpeechEngine, SpeechEvent};

use super::state::{SessionSnapshot, SessionState};

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors surfaced by the command side of a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The submitted text was blank. Rejected locally; nothing reaches the
    /// session.
    #[error("cannot speak blank text")]
    InvalidInput,

    /// The session has exited; no further commands are accepted.
    #[error("playback session has terminated")]
    Terminated,
}

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// Commands accepted by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Start (or restart) looped playback of `text`.
    Submit { text: String },
    /// Stop if speaking, otherwise restart the last text.
    Toggle,
    /// Stop playback and reset the play count.
    Stop,
    /// Terminate the session. Terminal.
    Exit,
    /// Make the status surface visible.
    ShowNotification,
    /// Withdraw the status surface without touching playback.
    HideNotification,
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Cloneable, non-blocking command surface of a [`PlaybackSession`].
///
/// All methods enqueue and return immediately; results of engine work arrive
/// later through the snapshot channel.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::UnboundedSender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Submit `text` for looped playback.
    ///
    /// Blank text is rejected here with [`SessionError::InvalidInput`] and
    /// never enqueued.
    pub fn submit(&self, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::InvalidInput);
        }
        self.send(SessionCommand::Submit {
            text: text.to_string(),
        })
    }

    pub fn toggle(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Toggle)
    }

    pub fn stop(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Stop)
    }

    pub fn exit(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Exit)
    }

    pub fn show_notification(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::ShowNotification)
    }

    pub fn hide_notification(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::HideNotification)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    fn send(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.cmd_tx.send(cmd).map_err(|_| SessionError::Terminated)
    }
}

// ---------------------------------------------------------------------------
// PlaybackSession
// ---------------------------------------------------------------------------

/// The playback state machine and its single-owner event loop.
///
/// Create with [`PlaybackSession::new`], wire the engine to the event
/// channel from [`crate::speech::event_channel`], then spawn
/// [`run`](Self::run) as a long-lived background task.
pub struct PlaybackSession {
    state: SessionState,
    current_text: String,
    play_count: u64,
    utterance_seq: u64,
    /// Token of the in-flight utterance; `None` when nothing is in flight,
    /// so every late completion is stale by construction.
    utterance_token: Option<String>,
    engine: Arc<dyn SpeechEngine>,
    notifier: NotificationController,
    cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl PlaybackSession {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        notifier: NotificationController,
    ) -> (Self, SessionHandle) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

        let session = Self {
            state: SessionState::Idle,
            current_text: String::new(),
            play_count: 0,
            utterance_seq: 0,
            utterance_token: None,
            engine,
            notifier,
            cmd_rx,
            snapshot_tx,
        };

        (
            session,
            SessionHandle {
                cmd_tx,
                snapshot_rx,
            },
        )
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the session until `exit` is processed.
    ///
    /// `events` is the receiving half of the engine's event channel. The
    /// loop survives the command channel closing (all handles dropped); it
    /// ends only on `Exit` or when both channels are gone.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<SpeechEvent>) {
        enum Input {
            Command(SessionCommand),
            Engine(SpeechEvent),
        }

        loop {
            let input = tokio::select! {
                Some(cmd) = self.cmd_rx.recv() => Input::Command(cmd),
                Some(event) = events.recv() => Input::Engine(event),
                else => break,
            };

            match input {
                Input::Command(cmd) => self.handle_command(cmd),
                Input::Engine(event) => self.handle_event(event),
            }

            if self.state.is_terminal() {
                break;
            }
        }

        log::info!("session: event loop terminated");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    fn handle_command(&mut self, cmd: SessionCommand) {
        if self.state.is_terminal() {
            return;
        }

        match cmd {
            SessionCommand::Submit { text } => self.submit(text),
            SessionCommand::Toggle => self.toggle(),
            SessionCommand::Stop => self.stop(),
            SessionCommand::Exit => self.exit(),
            SessionCommand::ShowNotification => {
                let snapshot = self.snapshot();
                self.notifier.show(&snapshot);
            }
            SessionCommand::HideNotification => self.notifier.hide(),
        }
    }

    fn submit(&mut self, text: String) {
        // Handles reject blank text already; keep the invariant local.
        if text.trim().is_empty() {
            log::warn!("session: ignoring blank submission");
            return;
        }

        if self.state == SessionState::Speaking {
            if text == self.current_text {
                // Already looping this exact text.
                log::debug!("session: resubmission of current text ignored");
                return;
            }
            self.engine.stop();
        }

        if text != self.current_text {
            self.play_count = 0;
        }

        self.current_text = text;
        self.state = SessionState::Speaking;
        self.speak_current();
        self.publish();
    }

    fn toggle(&mut self) {
        match self.state {
            SessionState::Speaking => self.stop(),
            SessionState::Idle => {
                if self.current_text.trim().is_empty() {
                    log::debug!("session: toggle before any submission ignored");
                    return;
                }
                self.state = SessionState::Speaking;
                self.speak_current();
                self.publish();
            }
            SessionState::Exiting => {}
        }
    }

    fn stop(&mut self) {
        if self.state != SessionState::Speaking {
            return;
        }
        self.state = SessionState::Idle;
        self.play_count = 0;
        self.utterance_token = None;
        self.engine.stop();
        self.publish();
    }

    fn exit(&mut self) {
        log::info!("session: exiting");
        self.state = SessionState::Exiting;
        self.utterance_token = None;
        self.engine.stop();
        self.notifier.hide();
        self.publish();
    }

    // -----------------------------------------------------------------------
    // Engine event handlers
    // -----------------------------------------------------------------------

    fn handle_event(&mut self, event: SpeechEvent) {
        if self.state.is_terminal() {
            return;
        }

        // Events from utterances this session no longer owns are stale:
        // their utterance was cancelled or replaced after the engine worker
        // had already queued the callback. Dropping them silently is the
        // intended outcome of that race.
        if self.utterance_token.as_deref() != Some(event.utterance_id()) {
            log::trace!(
                "session: discarding stale engine event for {}",
                event.utterance_id()
            );
            return;
        }

        match event {
            SpeechEvent::Started { .. } => {
                self.state = SessionState::Speaking;
                self.publish();
            }
            SpeechEvent::Done { .. } => {
                self.play_count += 1;
                if self.state == SessionState::Speaking {
                    // Loop continuation: same text, fresh token. Playback
                    // never ends on its own.
                    self.speak_current();
                } else {
                    self.utterance_token = None;
                }
                self.publish();
            }
            SpeechEvent::Error { utterance_id, message } => {
                log::warn!("session: engine error on {utterance_id}: {message}");
                self.state = SessionState::Idle;
                self.utterance_token = None;
                self.publish();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn speak_current(&mut self) {
        self.utterance_seq += 1;
        let token = format!("u{}", self.utterance_seq);
        self.engine.speak(&self.current_text, &token);
        self.utterance_token = Some(token);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            text: self.current_text.clone(),
            play_count: self.play_count,
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.notifier.refresh(&snapshot);
        self.snapshot_tx.send_replace(snapshot);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
