use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::ComposeMetrics;
use crate::panel::PanelSet;
use crate::registry::InstanceRegistry;
use crate::sync::{LinkCommand, LinkOptions};

use super::audit::{NullSyncAudit, SyncAudit, SyncAuditEventBuilder, SyncAuditStage};

/// Runtime capability the host must bundle alongside the composed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeDependency {
    pub name: String,
    pub version: String,
}

impl RuntimeDependency {
    /// The pan/zoom/cursor synchronization library.
    pub fn map_sync() -> Self {
        Self {
            name: "map-sync".to_string(),
            version: "0.2".to_string(),
        }
    }
}

/// Serializable description of the deferred bootstrap step.
///
/// Structured data only: the host templating layer renders it into whatever
/// textual or bytecode form its runtime requires. `to_json` is the single
/// serialization boundary; until then every flag stays a typed boolean.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapScript {
    /// Panel ids the registry scan looks for, in panel order.
    pub panel_ids: Vec<String>,
    /// Link directives applied once every listed panel had a chance to mount.
    pub commands: Vec<LinkCommand>,
    pub dependency: RuntimeDependency,
}

impl BootstrapScript {
    pub fn new(panels: &PanelSet, commands: Vec<LinkCommand>) -> Self {
        Self {
            panel_ids: panels.ids(),
            commands,
            dependency: RuntimeDependency::map_sync(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Capability the host environment lends to the deferred bootstrap run.
///
/// `mounted_instances` is the registry scan: it yields `(panel_id, handle)`
/// for every container whose underlying map instance is available. `link`
/// wires one live instance to another under the command's options.
pub trait WidgetHost {
    type Handle;

    fn mounted_instances(&mut self) -> Vec<(String, Self::Handle)>;

    fn link(
        &mut self,
        source: &Self::Handle,
        target: &Self::Handle,
        options: LinkOptions,
    ) -> Result<()>;
}

/// Outcome summary of one bootstrap run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Instances the registry scan found.
    pub mounted: usize,
    /// Commands applied against two live instances.
    pub applied: usize,
    /// Commands skipped because an instance was missing or the host refused
    /// the link. Skips never abort the remaining commands.
    pub skipped: usize,
}

/// One-shot engine applying a bootstrap script against a widget host.
///
/// The host registers the engine as its render-completion callback and calls
/// `run` exactly once; consuming `self` makes the single-shot, non-re-entrant
/// contract a type-level fact. There is no timeout or retry: if rendering
/// never completes, the run never happens and panels simply stay unlinked.
pub struct SyncBootstrap {
    script: BootstrapScript,
    logger: Option<Logger>,
    audit: Arc<dyn SyncAudit>,
    metrics: Option<Arc<Mutex<ComposeMetrics>>>,
}

impl SyncBootstrap {
    pub fn new(script: BootstrapScript) -> Self {
        Self {
            script,
            logger: None,
            audit: Arc::new(NullSyncAudit),
            metrics: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn SyncAudit>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Mutex<ComposeMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn script(&self) -> &BootstrapScript {
        &self.script
    }

    /// Build the instance registry, then apply every link command in
    /// generated order. Failure is per-command: a missing source or target,
    /// or a host refusal, skips that command and moves on.
    pub fn run<H>(self, host: &mut H) -> BootstrapReport
    where
        H: WidgetHost,
    {
        self.audit
            .record(SyncAuditEventBuilder::new(SyncAuditStage::BootstrapStarted).finish());

        let mut registry = InstanceRegistry::new();
        for (id, handle) in host.mounted_instances() {
            registry.record(id, handle);
        }

        self.audit.record(
            SyncAuditEventBuilder::new(SyncAuditStage::RegistryBuilt)
                .detail("mounted", json!(registry.len()))
                .detail("expected", json!(self.script.panel_ids.len()))
                .finish(),
        );

        let mut report = BootstrapReport {
            mounted: registry.len(),
            ..BootstrapReport::default()
        };

        for command in &self.script.commands {
            let pair = (
                registry.get(&command.source_id),
                registry.get(&command.target_id),
            );
            let (Some(source), Some(target)) = pair else {
                report.skipped += 1;
                self.record_skip(command, "instance not mounted");
                continue;
            };

            match host.link(source, target, command.options()) {
                Ok(()) => {
                    report.applied += 1;
                    self.audit.record(
                        SyncAuditEventBuilder::new(SyncAuditStage::CommandApplied)
                            .detail("source", json!(command.source_id))
                            .detail("target", json!(command.target_id))
                            .finish(),
                    );
                }
                Err(err) => {
                    report.skipped += 1;
                    self.record_skip(command, &err.to_string());
                }
            }
        }

        self.audit.record(
            SyncAuditEventBuilder::new(SyncAuditStage::BootstrapCompleted)
                .detail("applied", json!(report.applied))
                .detail("skipped", json!(report.skipped))
                .finish(),
        );

        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_bootstrap(report.applied, report.skipped);
            }
        }

        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(
                LogLevel::Info,
                "lattice::bootstrap",
                "bootstrap_completed",
                [
                    json_kv("mounted", json!(report.mounted)),
                    json_kv("applied", json!(report.applied)),
                    json_kv("skipped", json!(report.skipped)),
                ],
            );
            let _ = logger.log_event(event);
        }

        report
    }

    fn record_skip(&self, command: &LinkCommand, reason: &str) {
        self.audit.record(
            SyncAuditEventBuilder::new(SyncAuditStage::CommandSkipped)
                .detail("source", json!(command.source_id))
                .detail("target", json!(command.target_id))
                .detail("reason", json!(reason))
                .finish(),
        );
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(
                LogLevel::Warn,
                "lattice::bootstrap",
                "command_skipped",
                [
                    json_kv("source", json!(command.source_id)),
                    json_kv("target", json!(command.target_id)),
                    json_kv("reason", json!(reason)),
                ],
            );
            let _ = logger.log_event(event);
        }
    }
}
