use serde_json::json;

use crate::logging::{LogEvent, LogFields, LogLevel};

/// Counters accumulated across compose invocations and bootstrap runs.
#[derive(Debug, Default, Clone)]
pub struct ComposeMetrics {
    composes: u64,
    panels: u64,
    groups: u64,
    link_commands: u64,
    commands_applied: u64,
    commands_skipped: u64,
}

impl ComposeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_compose(&mut self, panels: usize, groups: usize, link_commands: usize) {
        self.composes = self.composes.saturating_add(1);
        self.panels = self.panels.saturating_add(panels as u64);
        self.groups = self.groups.saturating_add(groups as u64);
        self.link_commands = self.link_commands.saturating_add(link_commands as u64);
    }

    pub fn record_bootstrap(&mut self, applied: usize, skipped: usize) {
        self.commands_applied = self.commands_applied.saturating_add(applied as u64);
        self.commands_skipped = self.commands_skipped.saturating_add(skipped as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            composes: self.composes,
            panels: self.panels,
            groups: self.groups,
            link_commands: self.link_commands,
            commands_applied: self.commands_applied,
            commands_skipped: self.commands_skipped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub composes: u64,
    pub panels: u64,
    pub groups: u64,
    pub link_commands: u64,
    pub commands_applied: u64,
    pub commands_skipped: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "compose_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("composes".to_string(), json!(self.composes));
        map.insert("panels".to_string(), json!(self.panels));
        map.insert("groups".to_string(), json!(self.groups));
        map.insert("link_commands".to_string(), json!(self.link_commands));
        map.insert("commands_applied".to_string(), json!(self.commands_applied));
        map.insert("commands_skipped".to_string(), json!(self.commands_skipped));
        map
    }
}
