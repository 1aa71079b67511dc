//! Persistent status surface visibility.
//!
//! Visibility is its own axis, toggled by the user independently of whether
//! the playback session is speaking. The controller renders through the
//! [`NotificationSurface`] capability and never reaches into the session.

pub mod controller;

pub use controller::{LogSurface, NotificationController, NotificationSurface};
