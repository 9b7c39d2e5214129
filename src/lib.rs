//! Compose independently rendered map widgets into a grid lattice and wire
//! selected panels together so pan/zoom changes propagate across each
//! synchronization group.
//!
//! Planning is synchronous and near-pure: widgets are normalized into an
//! id-addressable panel set, the grid geometry is projected from
//! `(panel_count, ncol)`, and the sync specification expands into ordered,
//! self-excluding link commands. The single deferred step is the bootstrap
//! run the host triggers once after every widget has mounted.

pub mod bootstrap;
pub mod error;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod registry;
pub mod sync;
pub mod view;

pub use bootstrap::{
    BootstrapReport, BootstrapScript, NullSyncAudit, RuntimeDependency, SyncAudit, SyncAuditEvent,
    SyncAuditEventBuilder, SyncAuditStage, SyncBootstrap, WidgetHost,
};
pub use error::{LatticeError, Result};
pub use layout::{LayoutPlan, PanelBorder, PanelSlot};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, event_with_fields, json_kv,
};
pub use metrics::{ComposeMetrics, MetricSnapshot};
pub use panel::{IntoMapWidget, MapWidget, PanelDescriptor, PanelSet};
pub use registry::InstanceRegistry;
pub use sync::{LinkCommand, LinkOptions, SyncGroup, SyncSpec};
pub use view::{
    Composer, LatticeOptions, LatticeView, lattice_view, lattice_view_with, sync_view,
    sync_view_with,
};
