//! Capture provider backed by an external OCR program.
//!
//! Resolvability means the executable is on `PATH`; launching runs it and
//! takes whatever it prints on stdout as the recognized text. An empty
//! stdout or a non-zero exit is treated as the user cancelling the capture,
//! not as a failure.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

use super::resolver::{CaptureCandidate, CaptureError, CaptureOutcome, CaptureProvider};

// ---------------------------------------------------------------------------
// CommandCaptureProvider
// ---------------------------------------------------------------------------

/// Runs an external screen-OCR command and captures its stdout.
pub struct CommandCaptureProvider {
    program: String,
    args: Vec<String>,
}

impl CommandCaptureProvider {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CaptureProvider for CommandCaptureProvider {
    fn is_resolvable(&self) -> bool {
        find_in_path(&self.program, std::env::var_os("PATH").as_deref()).is_some()
    }

    fn launch(&self) -> Result<CaptureOutcome, CaptureError> {
        log::info!("capture: launching '{}'", self.program);

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| CaptureError::Launch(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            log::debug!(
                "capture: '{}' exited with {}; treating as cancelled",
                self.program,
                output.status
            );
            return Ok(CaptureOutcome::Cancelled);
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            Ok(CaptureOutcome::Cancelled)
        } else {
            Ok(CaptureOutcome::Text(text))
        }
    }
}

/// Locate `program` in the given `PATH`-style variable.
fn find_in_path(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

// ---------------------------------------------------------------------------
// Default candidate chain
// ---------------------------------------------------------------------------

/// The built-in capture-source chain, most capable first.
///
/// `normcap` is the preferred interactive screen-OCR tool; `gazou` is a
/// lighter alternative; bare `tesseract` over a fresh screenshot is the last
/// resort.
pub fn default_candidates() -> Vec<CaptureCandidate> {
    vec![
        CaptureCandidate::new(
            "normcap",
            Some("https://dynobo.github.io/normcap/".into()),
            Box::new(CommandCaptureProvider::new(
                "normcap",
                &["--clipboard", "--print"],
            )),
        ),
        CaptureCandidate::new(
            "gazou",
            Some("https://github.com/kevinhwang91/gazou".into()),
            Box::new(CommandCaptureProvider::new("gazou", &[])),
        ),
        CaptureCandidate::new(
            "tesseract",
            Some("https://tesseract-ocr.github.io/".into()),
            Box::new(CommandCaptureProvider::new(
                "tesseract",
                &["screenshot.png", "stdout"],
            )),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn find_in_path_locates_an_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let exe = dir.path().join("fake-ocr");
        std::fs::write(&exe, b"#!/bin/sh\n").unwrap();

        let path_var = OsString::from(dir.path());
        let found = find_in_path("fake-ocr", Some(path_var.as_os_str()));
        assert_eq!(found, Some(exe));
    }

    #[test]
    fn find_in_path_misses_absent_programs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path_var = OsString::from(dir.path());
        assert!(find_in_path("definitely-not-here", Some(path_var.as_os_str())).is_none());
        assert!(find_in_path("anything", None).is_none());
    }

    #[test]
    fn unresolvable_program_reports_unresolvable() {
        let provider = CommandCaptureProvider::new("sayagain-no-such-ocr-tool", &[]);
        assert!(!provider.is_resolvable());
    }

    #[cfg(unix)]
    #[test]
    fn launch_captures_stdout_as_text() {
        let provider = CommandCaptureProvider::new("sh", &["-c", "echo recognized words"]);
        let outcome = provider.launch().expect("launch");
        assert_eq!(outcome, CaptureOutcome::Text("recognized words".into()));
    }

    #[cfg(unix)]
    #[test]
    fn empty_stdout_is_a_cancellation() {
        let provider = CommandCaptureProvider::new("sh", &["-c", "true"]);
        assert_eq!(provider.launch().unwrap(), CaptureOutcome::Cancelled);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_a_cancellation() {
        let provider = CommandCaptureProvider::new("sh", &["-c", "echo ignored; exit 3"]);
        assert_eq!(provider.launch().unwrap(), CaptureOutcome::Cancelled);
    }

    #[test]
    fn missing_program_fails_to_launch() {
        let provider = CommandCaptureProvider::new("sayagain-no-such-ocr-tool", &[]);
        assert!(matches!(
            provider.launch(),
            Err(CaptureError::Launch(_))
        ));
    }

    #[test]
    fn default_chain_prefers_normcap() {
        let chain = default_candidates();
        assert_eq!(chain[0].id, "normcap");
        assert!(chain[0].install_url.is_some());
        assert_eq!(chain.len(), 3);
    }
}
