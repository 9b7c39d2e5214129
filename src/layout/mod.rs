//! Layout module orchestrator.
//!
//! The grid planner lives in the private `core` module; callers import the
//! plan types from here.

mod core;

pub use core::{LayoutPlan, PanelBorder, PanelSlot};
