#![forbid(unsafe_code)]

//! Test harness for the portfolio controllers.
//!
//! - [`MemorySurface`]: a page held in plain Rust collections, implementing
//!   every rendering port, with per-operation fault injection.
//! - [`capture`]: a `tracing` layer recording events for assertions.
//! - [`replay_jsonl`]: feed a recorded session (one JSON event per line,
//!   `{"advance_ms": N}` lines moving the clock) into an app.

pub mod capture;
pub mod memory;

pub use capture::{Captured, CapturedEvent, with_captured_events};
pub use memory::{AttachedNotice, FIXED_TIMESTAMP, MemorySurface, SUBMIT_LABEL};

use portfolio_core::{PortfolioApp, PortfolioConfig, Surface};
use serde::Deserialize;

/// A fully initialized app over the complete in-memory page.
#[must_use]
pub fn full_page_app() -> PortfolioApp<MemorySurface> {
    app_with(MemorySurface::full_page(), PortfolioConfig::default())
}

/// An initialized app over `surface` with `config`.
#[must_use]
pub fn app_with(surface: MemorySurface, config: PortfolioConfig) -> PortfolioApp<MemorySurface> {
    let mut app = PortfolioApp::new(surface, config);
    app.init();
    app
}

/// Outcome of [`replay_jsonl`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub events: usize,
    pub clock_moves: usize,
    pub rejected: usize,
}

/// Replay a recorded session.
///
/// Blank lines are skipped. A line `{"advance_ms": N}` advances the clock;
/// any other line is pushed as an encoded event.
pub fn replay_jsonl<S: Surface>(app: &mut PortfolioApp<S>, script: &str) -> ReplayReport {
    let mut report = ReplayReport::default();
    for line in script.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(ms) = parse_advance(line) {
            app.advance_time_ms(ms);
            report.clock_moves += 1;
        } else if app.push_encoded_event(line) {
            report.events += 1;
        } else {
            report.rejected += 1;
        }
    }
    report
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ClockMove {
    advance_ms: f64,
}

fn parse_advance(line: &str) -> Option<f64> {
    serde_json::from_str::<ClockMove>(line)
        .ok()
        .map(|clock| clock.advance_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_advance_lines() {
        assert_eq!(parse_advance(r#"{"advance_ms": 2000}"#), Some(2000.0));
        assert_eq!(parse_advance(r#"{"advance_ms":12.5}"#), Some(12.5));
        assert_eq!(parse_advance(r#"{"kind":"scroll","scroll_y":1}"#), None);
        assert_eq!(parse_advance(r#"{"advance_ms": "soon"}"#), None);
    }
}
