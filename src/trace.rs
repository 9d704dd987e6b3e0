//! Structured trace events for pipeline observability.
//!
//! The supervisor and pipeline stages report progress through an injected
//! [`TraceSink`] capability instead of a process-wide logger. The default
//! [`TracingSink`] forwards events to the `tracing` subscriber; tests and
//! embedders that want to display a step-by-step trace can use
//! [`MemorySink`] to buffer events instead.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structured event emitted by a pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Short machine-readable stage tag, e.g. `SUPERVISOR_MERGE`.
    pub stage: String,
    /// Human-readable description of what happened.
    pub message: String,
    /// Optional structured payload with counts, names, etc.
    pub detail: Option<Value>,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl TraceEvent {
    /// Build an event stamped with the current time.
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            detail: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a structured detail payload.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Install a global `tracing` subscriber for embedders that want the default
/// [`TracingSink`] output on stderr.
///
/// The filter comes from `RUST_LOG` when set, and defaults to `info` for this
/// crate otherwise. Calling this more than once is a no-op.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shopsage=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

/// Sink for trace events, passed explicitly to the components that emit them.
pub trait TraceSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: TraceEvent);
}

/// Default sink that forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, event: TraceEvent) {
        match &event.detail {
            Some(detail) => {
                tracing::info!(stage = %event.stage, detail = %detail, "{}", event.message)
            }
            None => tracing::info!(stage = %event.stage, "{}", event.message),
        }
    }
}

/// Sink that buffers events in memory.
///
/// Useful in tests and for embedders that render the trace to a user.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().clone()
    }

    /// True if any recorded event carries the given stage tag.
    pub fn has_stage(&self, stage: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.stage == stage)
    }
}

impl TraceSink for MemorySink {
    fn record(&self, event: TraceEvent) {
        self.events.lock().push(event);
    }
}
