//! Finder-comment annotation for downloaded bookmark files.
//!
//! Builds a small AppleScript parameterized with the POSIX path of a file
//! and a comment string, pipes it to the OS scripting interpreter
//! (`osascript -`), and waits for it to exit. Annotation is a best-effort
//! side effect: callers log failures and keep going.
//!
//! # Module structure note
//!
//! This module is intentionally a single file (`mod.rs`-only); the feature
//! scope is small enough to not warrant sub-files.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Upper bound on one interpreter invocation. A hung interpreter must not
/// stall the whole pass.
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced by annotation.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// Failed to spawn the interpreter or write the script to its stdin.
    #[error("failed to run script interpreter: {0}")]
    Io(#[from] std::io::Error),

    /// The interpreter exited unsuccessfully.
    #[error("script interpreter exited with status {code:?}: {stderr}")]
    ScriptFailed {
        /// Process exit code, when the process exited normally.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The interpreter did not exit within [`SCRIPT_TIMEOUT`].
    #[error("script interpreter timed out after {0:?}")]
    Timeout(Duration),
}

/// Capability seam for executing an automation script.
///
/// Production uses [`OsascriptRunner`]; tests substitute a fake so no
/// subprocess is spawned.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Runs `script` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError`] if the run fails or times out.
    async fn run(&self, script: &str) -> Result<(), AnnotateError>;
}

/// Runner that pipes the script to `osascript -` on standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsascriptRunner;

#[async_trait]
impl ScriptRunner for OsascriptRunner {
    async fn run(&self, script: &str) -> Result<(), AnnotateError> {
        let mut child = Command::new("osascript")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes()).await?;
            // Dropping the handle closes the pipe so the interpreter sees EOF.
        }

        let output = tokio::time::timeout(SCRIPT_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| AnnotateError::Timeout(SCRIPT_TIMEOUT))??;

        if output.status.success() {
            Ok(())
        } else {
            Err(AnnotateError::ScriptFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Sets human-readable comments on files via an injected [`ScriptRunner`].
pub struct Annotator {
    runner: Box<dyn ScriptRunner>,
}

impl Annotator {
    /// Creates an annotator backed by the OS scripting interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_runner(Box::new(OsascriptRunner))
    }

    /// Creates an annotator with a custom runner.
    #[must_use]
    pub fn with_runner(runner: Box<dyn ScriptRunner>) -> Self {
        Self { runner }
    }

    /// Sets the Finder comment of the file at `path` to `comment`.
    ///
    /// One interpreter subprocess per call, awaited to completion. No retry.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError`] if the interpreter cannot be spawned,
    /// exits unsuccessfully, or times out.
    #[instrument(skip(self, comment), fields(path = %path.display()))]
    pub async fn set_comment(
        &self,
        path: &std::path::Path,
        comment: &str,
    ) -> Result<(), AnnotateError> {
        let script = comment_script(&path.to_string_lossy(), comment);
        self.runner.run(&script).await?;
        debug!("Finder comment set");
        Ok(())
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the Finder comment script for `path` and `comment`.
///
/// Both parameters are escaped so embedded quotes and backslashes cannot
/// break out of the generated string literals.
fn comment_script(path: &str, comment: &str) -> String {
    format!(
        "set theFile to POSIX file \"{path}\"\n\
         tell application \"Finder\"\n\
         \tset comment of file theFile to \"{comment}\"\n\
         end tell\n",
        path = escape_text(path),
        comment = escape_text(comment),
    )
}

/// Escapes backslashes and double quotes for an AppleScript string literal.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
