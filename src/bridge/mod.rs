//! Foreground-to-background binding.
//!
//! The bridge makes the background session's lifetime independent of the
//! foreground controller: commands issued before (or between) connections
//! become durable start requests instead of being dropped.

pub mod binding;

pub use binding::{ServiceLauncher, SessionBridge, StartRequest};
