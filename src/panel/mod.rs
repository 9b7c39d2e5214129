//! Panel module orchestrator.
//!
//! The instance normalizer lives in the private `core` module; callers import
//! the widget and descriptor types from here.

mod core;

pub use core::{IntoMapWidget, MapWidget, PanelDescriptor, PanelSet};
