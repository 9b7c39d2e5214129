//! Bootstrap lifecycle audit utilities.
//!
//! Lightweight instrumentation hooks so callers can observe what the one-shot
//! bootstrap run did. Records capture a stage identifier plus structured
//! metadata so downstream code can log, buffer, or visualize the run without
//! contorting the engine itself.

use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted by `SyncBootstrap::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAuditStage {
    /// The deferred run was entered after the host signaled render completion.
    BootstrapStarted,
    /// The instance registry finished scanning mounted containers.
    RegistryBuilt,
    /// A link command was applied against two live instances.
    CommandApplied,
    /// A link command was skipped (instance missing or host link failure).
    CommandSkipped,
    /// The run finished; no further work will happen for this activation.
    BootstrapCompleted,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct SyncAuditEvent {
    pub timestamp: SystemTime,
    pub stage: SyncAuditStage,
    pub details: Vec<(String, Value)>,
}

impl SyncAuditEvent {
    fn new(stage: SyncAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }
}

/// Builder helper to append fields ergonomically.
pub struct SyncAuditEventBuilder {
    event: SyncAuditEvent,
}

impl SyncAuditEventBuilder {
    pub fn new(stage: SyncAuditStage) -> Self {
        Self {
            event: SyncAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> SyncAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait SyncAudit: Send + Sync {
    fn record(&self, event: SyncAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullSyncAudit;

impl SyncAudit for NullSyncAudit {
    fn record(&self, _event: SyncAuditEvent) {}
}
