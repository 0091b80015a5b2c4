#![forbid(unsafe_code)]

//! Tracing capture for asserting on emitted log events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

/// One log event as a test sees it.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub target: String,
    pub message: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Events captured while a closure ran.
#[derive(Debug, Clone, Default)]
pub struct Captured(pub Vec<CapturedEvent>);

impl Captured {
    /// Events logged on `target`.
    pub fn on_target<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a CapturedEvent> {
        self.0.iter().filter(move |event| event.target == target)
    }

    /// Entry points whose failure was recovered, in order.
    #[must_use]
    pub fn recovered_entries(&self) -> Vec<String> {
        self.on_target("portfolio.error")
            .filter_map(|event| event.field("entry").map(str::to_string))
            .collect()
    }

    /// Whether any event carried `message`.
    #[must_use]
    pub fn has_message(&self, message: &str) -> bool {
        self.0
            .iter()
            .any(|event| event.message.as_deref() == Some(message))
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for CaptureLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                message,
                fields,
            });
    }
}

/// Run `f` with a capturing subscriber installed for the current thread.
pub fn with_captured_events<R>(f: impl FnOnce() -> R) -> (R, Captured) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = CaptureLayer {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    let out = tracing::subscriber::with_default(subscriber, f);
    let captured = events
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    (out, Captured(captured))
}
