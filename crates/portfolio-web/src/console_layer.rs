#![forbid(unsafe_code)]

//! `tracing` layer writing one line per event to a console.
//!
//! Lines read `LEVEL target: message key=value ...`. The browser sink routes
//! them to `console.error/warn/info/log/debug` by level; tests plug in a
//! recording sink.

use core::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Destination of formatted log lines.
pub trait ConsoleSink: Send + Sync + 'static {
    fn write(&self, level: Level, line: &str);
}

pub struct ConsoleLayer<K> {
    sink: K,
    max_level: Level,
}

impl<K: ConsoleSink> ConsoleLayer<K> {
    /// Forward events at `max_level` or more severe to `sink`.
    #[must_use]
    pub const fn new(sink: K, max_level: Level) -> Self {
        Self { sink, max_level }
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Format one event the way the console shows it.
#[must_use]
pub fn format_line(metadata: &Metadata<'_>, event: &Event<'_>) -> String {
    let mut visitor = LineVisitor::default();
    event.record(&mut visitor);
    format!(
        "{} {}: {}{}",
        metadata.level(),
        metadata.target(),
        visitor.message,
        visitor.fields
    )
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: ConsoleSink,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        self.sink.write(*metadata.level(), &format_line(metadata, event));
    }
}

/// Browser console sink.
#[cfg(target_arch = "wasm32")]
pub struct BrowserConsole;

#[cfg(target_arch = "wasm32")]
impl ConsoleSink for BrowserConsole {
    fn write(&self, level: Level, line: &str) {
        let line = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            Level::DEBUG => web_sys::console::log_1(&line),
            Level::TRACE => web_sys::console::debug_1(&line),
        }
    }
}
