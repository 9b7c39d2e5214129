use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bootstrap::{BootstrapScript, SyncBootstrap};
use crate::error::Result;
use crate::layout::LayoutPlan;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::ComposeMetrics;
use crate::panel::{IntoMapWidget, PanelDescriptor, PanelSet};
use crate::sync::{LinkCommand, LinkOptions, SyncSpec};

/// Configuration for one lattice composition. Validated in full at the
/// orchestration boundary before any output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LatticeOptions {
    /// Grid column count.
    pub ncol: usize,
    /// Grouping specification for pan/zoom linking.
    pub sync: SyncSpec,
    /// Propagate the pointer position across linked panels.
    pub sync_cursor: bool,
    /// Suppress the immediate view alignment at link time.
    pub no_initial_sync: bool,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self::lattice()
    }
}

impl LatticeOptions {
    /// Defaults of the general-purpose lattice entry point: panels laid out,
    /// nothing linked.
    pub fn lattice() -> Self {
        Self {
            ncol: 2,
            sync: SyncSpec::None,
            sync_cursor: false,
            no_initial_sync: true,
        }
    }

    /// Defaults of the sync convenience entry point: every panel linked,
    /// cursor shared.
    pub fn synced() -> Self {
        Self {
            ncol: 2,
            sync: SyncSpec::All,
            sync_cursor: true,
            no_initial_sync: true,
        }
    }

    pub fn with_ncol(mut self, ncol: usize) -> Self {
        self.ncol = ncol;
        self
    }

    pub fn with_sync(mut self, sync: SyncSpec) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_sync_cursor(mut self, enabled: bool) -> Self {
        self.sync_cursor = enabled;
        self
    }

    pub fn with_no_initial_sync(mut self, enabled: bool) -> Self {
        self.no_initial_sync = enabled;
        self
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            sync_cursor: self.sync_cursor,
            no_initial_sync: self.no_initial_sync,
        }
    }
}

/// The composed, embeddable lattice artifact: panel containers in source
/// order, their grid geometry, and the deferred bootstrap script the host
/// runs after every widget has mounted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatticeView {
    pub panels: Vec<PanelDescriptor>,
    pub layout: LayoutPlan,
    pub script: BootstrapScript,
}

impl LatticeView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// A fresh one-shot engine over this view's script, for the host to
    /// register as its render-completion callback.
    pub fn bootstrap(&self) -> SyncBootstrap {
        SyncBootstrap::new(self.script.clone())
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn link_count(&self) -> usize {
        self.script.commands.len()
    }
}

/// Runs the composition pipeline for one set of options: normalize widgets
/// into an id-addressable panel set, resolve the sync groups, plan the grid,
/// expand link commands, and emit the bootstrap script.
pub struct Composer {
    options: LatticeOptions,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<ComposeMetrics>>>,
}

impl Composer {
    pub fn new(options: LatticeOptions) -> Self {
        Self {
            options,
            logger: None,
            metrics: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ComposeMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ComposeMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    pub fn options(&self) -> &LatticeOptions {
        &self.options
    }

    /// Run the pipeline. Each invocation produces an independent,
    /// self-contained panel set, layout, and command list; calling twice
    /// with identical inputs yields structurally identical views up to
    /// generated ids.
    pub fn compose<I, W>(&self, widgets: I) -> Result<LatticeView>
    where
        I: IntoIterator<Item = W>,
        W: IntoMapWidget,
    {
        let panels = PanelSet::from_widgets(widgets)?;
        let groups = self.options.sync.resolve(panels.len())?;
        let layout = LayoutPlan::plan(panels.len(), self.options.ncol)?;
        let commands = LinkCommand::generate(&groups, &panels, self.options.link_options())?;

        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_compose(panels.len(), groups.len(), commands.len());
            }
        }

        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(
                LogLevel::Info,
                "lattice::compose",
                "view_composed",
                [
                    json_kv("panels", json!(panels.len())),
                    json_kv("groups", json!(groups.len())),
                    json_kv("link_commands", json!(commands.len())),
                    json_kv("ncol", json!(self.options.ncol)),
                ],
            );
            let _ = logger.log_event(event);
        }

        let script = BootstrapScript::new(&panels, commands);
        Ok(LatticeView {
            panels: panels.into_panels(),
            layout,
            script,
        })
    }
}

/// Lay widgets out in a grid without linking any of them.
pub fn lattice_view<I, W>(widgets: I) -> Result<LatticeView>
where
    I: IntoIterator<Item = W>,
    W: IntoMapWidget,
{
    Composer::new(LatticeOptions::lattice()).compose(widgets)
}

/// `lattice_view` with explicit options.
pub fn lattice_view_with<I, W>(widgets: I, options: LatticeOptions) -> Result<LatticeView>
where
    I: IntoIterator<Item = W>,
    W: IntoMapWidget,
{
    Composer::new(options).compose(widgets)
}

/// Lay widgets out in a grid and link every panel to every other, sharing
/// the cursor.
pub fn sync_view<I, W>(widgets: I) -> Result<LatticeView>
where
    I: IntoIterator<Item = W>,
    W: IntoMapWidget,
{
    Composer::new(LatticeOptions::synced()).compose(widgets)
}

/// `sync_view` with explicit options.
pub fn sync_view_with<I, W>(widgets: I, options: LatticeOptions) -> Result<LatticeView>
where
    I: IntoIterator<Item = W>,
    W: IntoMapWidget,
{
    Composer::new(options).compose(widgets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LatticeError;
    use crate::logging::MemorySink;
    use crate::panel::MapWidget;
    use serde_json::json;

    fn widgets(n: usize) -> Vec<MapWidget> {
        (0..n)
            .map(|i| MapWidget::with_id(format!("m{i}"), json!({"layer": i})))
            .collect()
    }

    fn pairs(view: &LatticeView) -> Vec<(String, String)> {
        view.script
            .commands
            .iter()
            .map(|c| (c.source_id.clone(), c.target_id.clone()))
            .collect()
    }

    #[test]
    fn lattice_defaults_link_nothing() {
        let view = lattice_view(widgets(4)).unwrap();
        assert_eq!(view.panel_count(), 4);
        assert_eq!(view.link_count(), 0);
        assert_eq!(view.layout.ncol, 2);
        assert_eq!(view.layout.nrow, 2);
    }

    #[test]
    fn sync_defaults_link_everything_with_cursor() {
        let view = sync_view(widgets(3)).unwrap();
        assert_eq!(view.link_count(), 6);
        assert!(view
            .script
            .commands
            .iter()
            .all(|c| c.sync_cursor && c.no_initial_sync));
    }

    #[test]
    fn two_disjoint_groups_yield_exactly_four_commands() {
        let options = LatticeOptions::lattice()
            .with_sync(SyncSpec::Groups(vec![vec![0, 1], vec![2, 3]]))
            .with_sync_cursor(true);
        let view = lattice_view_with(widgets(4), options).unwrap();

        assert_eq!(
            pairs(&view),
            vec![
                ("m0".into(), "m1".into()),
                ("m1".into(), "m0".into()),
                ("m2".into(), "m3".into()),
                ("m3".into(), "m2".into()),
            ]
        );
    }

    #[test]
    fn three_member_group_leaves_the_fourth_panel_unlinked() {
        let options =
            LatticeOptions::lattice().with_sync(SyncSpec::Groups(vec![vec![0, 1, 3]]));
        let view = lattice_view_with(widgets(4), options).unwrap();

        assert_eq!(view.link_count(), 6);
        assert!(view
            .script
            .commands
            .iter()
            .all(|c| c.source_id != "m2" && c.target_id != "m2"));
    }

    #[test]
    fn out_of_range_group_rejects_before_any_output() {
        let options = LatticeOptions::lattice().with_sync(SyncSpec::Groups(vec![vec![0, 4]]));
        let err = lattice_view_with(widgets(4), options).unwrap_err();
        assert!(matches!(
            err,
            LatticeError::PanelIndexOutOfRange {
                index: 4,
                panel_count: 4
            }
        ));
    }

    #[test]
    fn zero_columns_reject_before_any_output() {
        let options = LatticeOptions::lattice().with_ncol(0);
        assert!(matches!(
            lattice_view_with(widgets(2), options),
            Err(LatticeError::InvalidColumnCount)
        ));
    }

    #[test]
    fn empty_input_is_a_valid_no_op() {
        let view = sync_view(Vec::<MapWidget>::new()).unwrap();
        assert_eq!(view.panel_count(), 0);
        assert_eq!(view.link_count(), 0);
        assert_eq!(view.layout.nrow, 0);
    }

    #[test]
    fn single_panel_sync_all_emits_no_commands() {
        let view = sync_view(widgets(1)).unwrap();
        assert_eq!(view.panel_count(), 1);
        assert_eq!(view.link_count(), 0);
    }

    #[test]
    fn identical_inputs_compose_identical_views() {
        let options = LatticeOptions::synced().with_ncol(3);
        let first = sync_view_with(widgets(5), options.clone()).unwrap();
        let second = sync_view_with(widgets(5), options).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn generated_ids_keep_structure_stable_across_runs() {
        let make = || {
            sync_view((0..3).map(|i| MapWidget::new(json!({"layer": i})))).unwrap()
        };
        let first = make();
        let second = make();

        assert_ne!(first.panels[0].id, second.panels[0].id);
        assert_eq!(first.link_count(), second.link_count());
        assert_eq!(first.layout, second.layout);
        // Same index-to-pair structure once ids are mapped back to indices.
        let index_pairs = |view: &LatticeView| {
            let index_of = |id: &str| {
                view.panels
                    .iter()
                    .position(|p| p.id == id)
                    .expect("command id belongs to a panel")
            };
            view.script
                .commands
                .iter()
                .map(|c| (index_of(&c.source_id), index_of(&c.target_id)))
                .collect::<Vec<_>>()
        };
        assert_eq!(index_pairs(&first), index_pairs(&second));
    }

    #[test]
    fn view_serializes_panels_layout_and_script() {
        let view = sync_view(widgets(2)).unwrap();
        let json = view.to_json().unwrap();
        assert!(json.contains("\"panels\""));
        assert!(json.contains("\"layout\""));
        assert!(json.contains("\"script\""));
        assert!(json.contains("\"widthPct\":49"));
    }

    #[test]
    fn options_deserialize_from_host_configuration() {
        let options: LatticeOptions =
            serde_json::from_str("{\"sync\":\"all\",\"ncol\":3}").unwrap();
        assert_eq!(options.sync, SyncSpec::All);
        assert_eq!(options.ncol, 3);
        assert!(!options.sync_cursor);
        assert!(options.no_initial_sync);

        let options: LatticeOptions =
            serde_json::from_str("{\"sync\":[[0,1],[2,3]],\"syncCursor\":true}").unwrap();
        assert_eq!(options.sync, SyncSpec::Groups(vec![vec![0, 1], vec![2, 3]]));
        assert!(options.sync_cursor);
    }

    #[test]
    fn composer_reports_through_logger_and_metrics() {
        let sink = Arc::new(MemorySink::new());
        let mut composer =
            Composer::new(LatticeOptions::synced()).with_logger(Logger::new(sink.clone()));
        composer.enable_metrics();

        composer.compose(widgets(4)).unwrap();

        let events = sink.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "view_composed");
        assert_eq!(events[0].fields.get("link_commands"), Some(&json!(12)));

        let handle = composer.metrics_handle().unwrap();
        let snapshot = handle.lock().unwrap().snapshot();
        assert_eq!(snapshot.panels, 4);
        assert_eq!(snapshot.link_commands, 12);
    }
}
