//! Notification visibility control.
//!
//! Whether the persistent status surface is visible is a user choice that is
//! independent of whether playback is running: a hidden notification must
//! not stop the session, and a stopped session may still show its (paused)
//! notification. [`NotificationController`] owns that visibility flag and
//! reconciles it with session snapshots; the actual presentation is behind
//! the [`NotificationSurface`] capability.

use crate::session::state::SessionSnapshot;

// ---------------------------------------------------------------------------
// NotificationSurface
// ---------------------------------------------------------------------------

/// Presentation capability for the persistent status surface.
///
/// Implemented by the host platform (a system notification, a tray item, a
/// status line). [`LogSurface`] is the headless reference implementation.
pub trait NotificationSurface: Send {
    /// Render or update the surface.
    fn render(&mut self, title: &str, is_playing: bool, play_count: u64);

    /// Remove the surface from view.
    fn withdraw(&mut self);
}

/// Reference surface that renders to the log, for headless runs.
#[derive(Debug, Default)]
pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn render(&mut self, title: &str, is_playing: bool, play_count: u64) {
        let status = if is_playing { "playing" } else { "paused" };
        log::info!("notification: {title} [{status}, played {play_count}x]");
    }

    fn withdraw(&mut self) {
        log::info!("notification: withdrawn");
    }
}

// ---------------------------------------------------------------------------
// NotificationController
// ---------------------------------------------------------------------------

/// Tracks whether the status surface should be shown and renders it from
/// session snapshots when it should.
///
/// `hide` withdraws the surface but deliberately leaves playback untouched;
/// the session keeps speaking silently so a later `show` resumes reflecting
/// an uninterrupted loop.
pub struct NotificationController {
    surface: Box<dyn NotificationSurface>,
    should_show: bool,
}

impl NotificationController {
    /// Characters of session text shown in the title before truncation.
    const TITLE_CHARS: usize = 32;

    pub fn new(surface: Box<dyn NotificationSurface>) -> Self {
        Self {
            surface,
            should_show: false,
        }
    }

    /// Whether the surface is currently meant to be visible.
    pub fn is_visible(&self) -> bool {
        self.should_show
    }

    /// Make the surface visible and render it immediately from `snapshot`.
    pub fn show(&mut self, snapshot: &SessionSnapshot) {
        self.should_show = true;
        self.render(snapshot);
    }

    /// Withdraw the surface. Playback state is not touched.
    pub fn hide(&mut self) {
        self.should_show = false;
        self.surface.withdraw();
    }

    /// Re-render from `snapshot` if the surface is visible; otherwise a
    /// no-op.
    pub fn refresh(&mut self, snapshot: &SessionSnapshot) {
        if self.should_show {
            self.render(snapshot);
        }
    }

    fn render(&mut self, snapshot: &SessionSnapshot) {
        let title = Self::title(snapshot);
        self.surface
            .render(&title, snapshot.state.is_playing(), snapshot.play_count);
    }

    /// Title line: an excerpt of the session text, or the app name before
    /// any text has been submitted.
    fn title(snapshot: &SessionSnapshot) -> String {
        if snapshot.text.is_empty() {
            return "sayagain".to_string();
        }
        let mut title: String = snapshot.text.chars().take(Self::TITLE_CHARS).collect();
        if snapshot.text.chars().count() > Self::TITLE_CHARS {
            title.push('…');
        }
        title
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
