//! Playback session states and snapshots.
//!
//! [`SessionState`] drives the playback state machine. Observers (the
//! foreground controller, the notification surface) never touch the machine
//! directly; they read [`SessionSnapshot`]s published after every mutation.

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of the playback session.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──submit / toggle──────▶ Speaking
/// Speaking ──utterance done──▶ Speaking   (loop continuation)
/// Speaking ──stop / toggle───▶ Idle
/// Speaking ──engine error────▶ Idle
/// any state ──exit───────────▶ Exiting    (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No utterance in flight; waiting for text or a toggle.
    Idle,

    /// An utterance is in flight; completion re-submits the same text so
    /// playback loops until explicitly stopped.
    Speaking,

    /// The session is shutting down. Terminal; no command leaves this state.
    Exiting,
}

impl SessionState {
    /// Returns `true` when no further transitions are possible.
    ///
    /// ```
    /// use sayagain::session::SessionState;
    ///
    /// assert!(!SessionState::Idle.is_terminal());
    /// assert!(!SessionState::Speaking.is_terminal());
    /// assert!(SessionState::Exiting.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Exiting)
    }

    /// Returns `true` while an utterance loop is active.
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionState::Speaking)
    }

    /// A short human-readable label suitable for status display.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Speaking => "Speaking",
            SessionState::Exiting => "Exiting",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// Immutable view of a session at one point in time.
///
/// Published on a `tokio::sync::watch` channel after every state mutation
/// and handed to the notification controller for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Current state of the playback machine.
    pub state: SessionState,
    /// The text the session is (or was last) speaking.
    pub text: String,
    /// How many times the current text has been spoken to completion.
    pub play_count: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn only_exiting_is_terminal() {
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Speaking.is_terminal());
        assert!(SessionState::Exiting.is_terminal());
    }

    #[test]
    fn only_speaking_is_playing() {
        assert!(!SessionState::Idle.is_playing());
        assert!(SessionState::Speaking.is_playing());
        assert!(!SessionState::Exiting.is_playing());
    }

    #[test]
    fn labels_are_distinct() {
        assert_eq!(SessionState::Idle.label(), "Idle");
        assert_eq!(SessionState::Speaking.label(), "Speaking");
        assert_eq!(SessionState::Exiting.label(), "Exiting");
    }

    #[test]
    fn default_snapshot_is_empty_idle() {
        let snap = SessionSnapshot::default();
        assert_eq!(snap.state, SessionState::Idle);
        assert!(snap.text.is_empty());
        assert_eq!(snap.play_count, 0);
    }
}
