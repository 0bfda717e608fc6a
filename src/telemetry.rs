//! Usage tracking.
//!
//! Fire-and-forget: tracking never affects control flow and never fails the
//! caller. Event names mirror the page actions (`RelationshipPage.Load`,
//! `RelationshipPage.AssetClicked`, ...).

use serde_json::Value;
use std::sync::Mutex;
use uuid::Uuid;

/// Telemetry sink for user-interaction events.
pub trait UsageTracker: Send + Sync {
    fn track(&self, event: &str, properties: Value);
}

/// Install a default fmt subscriber honoring `RUST_LOG`. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Tracker that emits events as structured `tracing` records, stamped with a
/// per-session id.
#[derive(Debug)]
pub struct LogTracker {
    session_id: Uuid,
}

impl LogTracker {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Default for LogTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageTracker for LogTracker {
    fn track(&self, event: &str, properties: Value) {
        tracing::info!(
            target: "asset_relations::usage",
            session_id = %self.session_id,
            event,
            properties = %properties,
        );
    }
}

/// Tracker that drops everything.
#[derive(Debug, Default)]
pub struct NoopTracker;

impl UsageTracker for NoopTracker {
    fn track(&self, _event: &str, _properties: Value) {}
}

/// Tracker that records events in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingTracker {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl UsageTracker for RecordingTracker {
    fn track(&self, event: &str, properties: Value) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), properties));
    }
}
