//! Bootstrap module orchestrator.
//!
//! The script descriptor and the one-shot application engine live in `core`;
//! lifecycle audit hooks live in `audit`.

pub mod audit;
mod core;

pub use audit::{NullSyncAudit, SyncAudit, SyncAuditEvent, SyncAuditEventBuilder, SyncAuditStage};
pub use core::{BootstrapReport, BootstrapScript, RuntimeDependency, SyncBootstrap, WidgetHost};
