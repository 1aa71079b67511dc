//! sayagain — translate text and hear it spoken on a loop.
//!
//! Text is captured (via an external OCR tool) or typed, translated between
//! Chinese and English, and then spoken repeatedly by a background playback
//! session until the user explicitly stops it. The session survives the
//! foreground controller going away; a status notification can be shown or
//! hidden at any time without touching playback.
//!
//! # Architecture
//!
//! ```text
//! capture ──▶ lang ──▶ translate ──▶ session ◀──▶ speech
//!   (OCR)   (direction) (selector)     │  ▲        (engine events)
//!                                      │  └── bridge (foreground link)
//!                                      ▼
//!                                   notify (visibility ⊥ playback)
//! ```
//!
//! The `session` actor is the only place state mutates; everything else is
//! either a capability interface implemented by external collaborators
//! (speech engine, translators, OCR providers, notification surface) or
//! plain I/O glue (`config`, `export`).

pub mod bridge;
pub mod capture;
pub mod config;
pub mod export;
pub mod lang;
pub mod notify;
pub mod session;
pub mod speech;
pub mod translate;
