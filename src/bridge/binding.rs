//! Foreground-to-background session binding.
//!
//! The background session may not exist yet when the foreground controller
//! issues its first command. Until a connection is established, commands
//! are translated into durable [`StartRequest`]s delivered fire-and-forget
//! through the host's [`ServiceLauncher`]; the launcher both starts the
//! background task if needed and hands it the request, so text submitted
//! just before the connection exists is never lost.
//!
//! Once connected, commands take the direct [`SessionHandle`] path. Nothing
//! is replayed on connect (the session already received the start
//! requests). Disconnecting severs only the control link; background
//! playback is unaffected.

use std::sync::Arc;

use crate::session::{SessionError, SessionHandle};

// ---------------------------------------------------------------------------
// StartRequest / ServiceLauncher
// ---------------------------------------------------------------------------

/// A durable command for a background session that may not be running yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartRequest {
    /// Start (or restart) looped playback of `text`.
    Play { text: String },
    /// Stop playback.
    Stop,
    /// Terminate the background session.
    Exit,
    /// Make the status surface visible.
    ShowNotification,
    /// Withdraw the status surface.
    HideNotification,
}

/// Host capability that starts the background task and delivers
/// [`StartRequest`]s to it.
///
/// Both methods are fire-and-forget: they must not block and report no
/// result. Connection completion is signalled back through
/// [`SessionBridge::on_connected`].
pub trait ServiceLauncher: Send + Sync {
    /// Deliver `request`, starting the background task first if necessary.
    fn start(&self, request: StartRequest);

    /// Initiate a control connection to the background task.
    fn bind(&self);
}

// ---------------------------------------------------------------------------
// SessionBridge
// ---------------------------------------------------------------------------

/// Connects a foreground controller to the long-lived background session,
/// tolerating rebinding.
pub struct SessionBridge {
    launcher: Arc<dyn ServiceLauncher>,
    handle: Option<SessionHandle>,
    /// A bind was requested and has not completed yet.
    binding: bool,
}

impl SessionBridge {
    pub fn new(launcher: Arc<dyn ServiceLauncher>) -> Self {
        Self {
            launcher,
            handle: None,
            binding: false,
        }
    }

    /// Whether the direct command path is available.
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// The bound handle, when connected.
    pub fn handle(&self) -> Option<&SessionHandle> {
        self.handle.as_ref()
    }

    /// Request a connection if none exists and none is pending.
    pub fn ensure_bound(&mut self) {
        if self.handle.is_none() && !self.binding {
            log::debug!("bridge: requesting connection to background session");
            self.binding = true;
            self.launcher.bind();
        }
    }

    /// The connection completed; open the direct path.
    ///
    /// Deliberately replays nothing: every command issued while unbound
    /// already reached the session as a start request.
    pub fn on_connected(&mut self, handle: SessionHandle) {
        log::debug!("bridge: connected");
        self.handle = Some(handle);
        self.binding = false;
    }

    /// The connection dropped. Background playback is unaffected; only the
    /// control link is severed.
    pub fn on_disconnected(&mut self) {
        log::debug!("bridge: disconnected");
        self.handle = None;
        self.binding = false;
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Submit `text` for looped playback.
    ///
    /// Blank text is rejected locally either way. Unbound submissions
    /// become durable `Play` start requests.
    pub fn submit(&self, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::InvalidInput);
        }
        match &self.handle {
            Some(handle) => handle.submit(text),
            None => {
                self.launcher.start(StartRequest::Play {
                    text: text.to_string(),
                });
                Ok(())
            }
        }
    }

    pub fn stop(&self) -> Result<(), SessionError> {
        self.dispatch(StartRequest::Stop, SessionHandle::stop)
    }

    pub fn exit(&self) -> Result<(), SessionError> {
        self.dispatch(StartRequest::Exit, SessionHandle::exit)
    }

    pub fn show_notification(&self) -> Result<(), SessionError> {
        self.dispatch(StartRequest::ShowNotification, SessionHandle::show_notification)
    }

    pub fn hide_notification(&self) -> Result<(), SessionError> {
        self.dispatch(StartRequest::HideNotification, SessionHandle::hide_notification)
    }

    fn dispatch(
        &self,
        request: StartRequest,
        direct: fn(&SessionHandle) -> Result<(), SessionError>,
    ) -> Result<(), SessionError> {
        match &self.handle {
            Some(handle) => direct(handle),
            None => {
                self.launcher.start(request);
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{LogSurface, NotificationController};
    use crate::session::PlaybackSession;
    use crate::speech::{ScriptedEngine, SpeechEngine};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        requests: Mutex<Vec<StartRequest>>,
        binds: AtomicUsize,
    }

    impl RecordingLauncher {
        fn requests(&self) -> Vec<StartRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ServiceLauncher for RecordingLauncher {
        fn start(&self, request: StartRequest) {
            self.requests.lock().unwrap().push(request);
        }

        fn bind(&self) {
            self.binds.fetch_add(1, Ordering::SeqCst);
        }
    }

    // The session is returned alongside its handle so the command channel
    // stays open for the duration of the test.
    fn make_handle() -> (SessionHandle, PlaybackSession) {
        let engine = Arc::new(ScriptedEngine::new());
        let notifier = NotificationController::new(Box::new(LogSurface));
        let (session, handle) =
            PlaybackSession::new(engine as Arc<dyn SpeechEngine>, notifier);
        (handle, session)
    }

    #[test]
    fn unbound_submit_becomes_a_durable_play_request() {
        let launcher = Arc::new(RecordingLauncher::default());
        let bridge = SessionBridge::new(Arc::clone(&launcher) as Arc<dyn ServiceLauncher>);

        bridge.submit("hello").unwrap();

        assert_eq!(
            launcher.requests(),
            vec![StartRequest::Play {
                text: "hello".into()
            }]
        );
    }

    #[test]
    fn blank_submit_is_rejected_locally_even_when_unbound() {
        let launcher = Arc::new(RecordingLauncher::default());
        let bridge = SessionBridge::new(Arc::clone(&launcher) as Arc<dyn ServiceLauncher>);

        assert_eq!(bridge.submit("  "), Err(SessionError::InvalidInput));
        assert!(launcher.requests().is_empty());
    }

    #[test]
    fn unbound_control_commands_become_start_requests() {
        let launcher = Arc::new(RecordingLauncher::default());
        let bridge = SessionBridge::new(Arc::clone(&launcher) as Arc<dyn ServiceLauncher>);

        bridge.stop().unwrap();
        bridge.show_notification().unwrap();
        bridge.hide_notification().unwrap();
        bridge.exit().unwrap();

        assert_eq!(
            launcher.requests(),
            vec![
                StartRequest::Stop,
                StartRequest::ShowNotification,
                StartRequest::HideNotification,
                StartRequest::Exit,
            ]
        );
    }

    #[test]
    fn ensure_bound_requests_one_connection_until_it_completes() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut bridge = SessionBridge::new(Arc::clone(&launcher) as Arc<dyn ServiceLauncher>);

        bridge.ensure_bound();
        bridge.ensure_bound();
        assert_eq!(launcher.binds.load(Ordering::SeqCst), 1);

        let (handle, _session) = make_handle();
        bridge.on_connected(handle);
        assert!(bridge.is_bound());

        // Bound: no further bind requests.
        bridge.ensure_bound();
        assert_eq!(launcher.binds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bound_commands_take_the_direct_path() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut bridge = SessionBridge::new(Arc::clone(&launcher) as Arc<dyn ServiceLauncher>);

        let (handle, _session) = make_handle();
        bridge.on_connected(handle);

        bridge.submit("hello").unwrap();
        bridge.stop().unwrap();

        // Nothing went through the launcher.
        assert!(launcher.requests().is_empty());
    }

    #[test]
    fn disconnect_falls_back_to_start_requests_and_allows_rebinding() {
        let launcher = Arc::new(RecordingLauncher::default());
        let mut bridge = SessionBridge::new(Arc::clone(&launcher) as Arc<dyn ServiceLauncher>);

        let (handle, _session) = make_handle();
        bridge.on_connected(handle);
        bridge.on_disconnected();
        assert!(!bridge.is_bound());

        bridge.submit("after disconnect").unwrap();
        assert_eq!(
            launcher.requests(),
            vec![StartRequest::Play {
                text: "after disconnect".into()
            }]
        );

        bridge.ensure_bound();
        assert_eq!(launcher.binds.load(Ordering::SeqCst), 1);

        let (handle2, _session2) = make_handle();
        bridge.on_connected(handle2);
        assert!(bridge.is_bound());
    }
}
