#![forbid(unsafe_code)]

//! Error types and the per-entry-point recovery boundary.
//!
//! Controllers never let a failure escape to the host. Each entry point runs
//! inside [`recover`], which logs the failure on the `portfolio.error` target
//! (with the entry point name as the marker) and swallows it, so one broken
//! feature cannot stop the others from initializing or reacting to events.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a rendering port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// An element the operation depends on is not in the document.
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    /// The host rejected a DOM operation.
    #[error("host error: {0}")]
    Host(String),
}

/// Run one controller entry point, logging and swallowing any failure.
///
/// Returns `None` when the entry point failed.
pub fn recover<T>(entry: &'static str, f: impl FnOnce() -> Result<T, SurfaceError>) -> Option<T> {
    match f() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(
                target: "portfolio.error",
                entry,
                error = %err,
                "entry point failed"
            );
            None
        }
    }
}

/// Message fragments that identify a missing-element / null-reference failure.
///
/// Those are already recovered locally by the controllers, so the page-level
/// handler does not surface them to the visitor.
const NULL_REFERENCE_MARKERS: [&str; 3] = ["Cannot read properties", "null", "undefined"];

/// An uncaught error observed by the page-level error listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageError {
    pub message: String,
    pub filename: String,
    pub lineno: u32,
    pub colno: u32,
    /// `error.name` of the thrown value; `None` when no error object was attached.
    pub error_name: Option<String>,
}

impl PageError {
    /// Whether this error deserves a user-visible "please reload" notification.
    #[must_use]
    pub fn should_notify(&self) -> bool {
        let Some(name) = self.error_name.as_deref() else {
            return false;
        };
        name != "TypeError"
            && !NULL_REFERENCE_MARKERS
                .iter()
                .any(|marker| self.message.contains(marker))
    }
}
