//! Tracing setup for the server binary, and an in-memory capture used by the
//! tests to assert on what a request logged.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Filter used when `RUST_LOG` is unset: engine and server lifecycle at
/// info, session detail at debug.
pub const DEFAULT_FILTER: &str = "info,fivedraw_web=debug";

/// Installs the fmt subscriber for the server binary. A second call keeps
/// the subscriber already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

/// One captured event. String fields are stored as written, everything
/// else in its `Debug` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Shared buffer of captured events. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self) -> CaptureLayer {
        CaptureLayer { sink: self.clone() }
    }

    /// Captures events on the current thread until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        tracing::subscriber::set_default(Registry::default().with(self.layer()))
    }

    /// Runs `f` with this capture as the thread's subscriber.
    pub fn capture<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::subscriber::with_default(Registry::default().with(self.layer()), f)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// First entry at `level` whose message contains `message`.
    pub fn find(&self, level: Level, message: &str) -> Option<LogEntry> {
        self.lock()
            .iter()
            .find(|e| e.level == level && e.message.contains(message))
            .cloned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // a panicking test must not hide the entries from the others
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `tracing_subscriber` layer feeding a [`TestLogSubscriber`].
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    sink: TestLogSubscriber,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let metadata = event.metadata();
        self.sink.lock().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: fields.message,
            fields: fields.values,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    values: Vec<(String, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.values.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Process-wide capture for integration tests. The global subscriber is
/// installed on the first call; every call clears the buffer.
pub fn init_test_logging() -> TestLogSubscriber {
    static CAPTURE: OnceLock<TestLogSubscriber> = OnceLock::new();
    let capture = CAPTURE.get_or_init(|| {
        let capture = TestLogSubscriber::new();
        let _ = tracing::subscriber::set_global_default(Registry::default().with(capture.layer()));
        capture
    });
    capture.clear();
    capture.clone()
}
