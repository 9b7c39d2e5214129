//! View module orchestrator.
//!
//! The composition pipeline and the public entry points live in the private
//! `core` module.

mod core;

pub use core::{
    Composer, LatticeOptions, LatticeView, lattice_view, lattice_view_with, sync_view,
    sync_view_with,
};
