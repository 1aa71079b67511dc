//! Capture (OCR) source resolution.
//!
//! A prioritized chain of possibly-installed external providers, probed
//! lazily and in order; the first usable one handles the capture. See
//! [`CaptureResolver`] for the order-significance contract.

pub mod command;
pub mod resolver;

pub use command::{default_candidates, CommandCaptureProvider};
pub use resolver::{
    CaptureCandidate, CaptureError, CaptureOutcome, CaptureProvider, CaptureResolver,
};
