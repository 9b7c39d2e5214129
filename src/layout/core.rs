use serde::Serialize;

use crate::error::{LatticeError, Result};

/// Border drawn between adjacent panel containers. Presentation plumbing for
/// the host styling layer; the planner only carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelBorder {
    pub width_px: u8,
    pub style: String,
    pub color: String,
}

impl Default for PanelBorder {
    fn default() -> Self {
        Self {
            width_px: 1,
            style: "solid".to_string(),
            color: "#BEBEBE".to_string(),
        }
    }
}

/// Display slot for one panel: grid position plus width share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSlot {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Percentage share of the container width.
    pub width_pct: u8,
}

/// Stateless projection of `(panel_count, ncol)` into per-panel geometry.
///
/// Flow is left-to-right, wrapping every `ncol` panels, matching a container
/// of exactly `panel_count` block elements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub ncol: usize,
    pub nrow: usize,
    pub slots: Vec<PanelSlot>,
    pub border: PanelBorder,
}

impl LayoutPlan {
    /// Plan the grid. `ncol == 0` is rejected; `ncol >= panel_count` is the
    /// degenerate single-row case and carries no warning.
    pub fn plan(panel_count: usize, ncol: usize) -> Result<Self> {
        if ncol == 0 {
            return Err(LatticeError::InvalidColumnCount);
        }

        // One percent is held back per panel so the border between adjacent
        // containers stays visible.
        let width_pct = (100 / ncol).saturating_sub(1) as u8;
        let slots = (0..panel_count)
            .map(|index| PanelSlot {
                index,
                row: index / ncol,
                col: index % ncol,
                width_pct,
            })
            .collect();

        Ok(Self {
            ncol,
            nrow: panel_count.div_ceil(ncol),
            slots,
            border: PanelBorder::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_columns_is_rejected() {
        assert!(matches!(
            LayoutPlan::plan(4, 0),
            Err(LatticeError::InvalidColumnCount)
        ));
    }

    #[test]
    fn empty_panel_set_plans_to_zero_rows() {
        let plan = LayoutPlan::plan(0, 2).unwrap();
        assert_eq!(plan.nrow, 0);
        assert!(plan.slots.is_empty());
    }

    #[test]
    fn rows_wrap_every_ncol_panels() {
        let plan = LayoutPlan::plan(5, 2).unwrap();
        assert_eq!(plan.nrow, 3);
        let positions: Vec<_> = plan.slots.iter().map(|s| (s.row, s.col)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn every_panel_gets_exactly_one_slot() {
        for panel_count in 0..12 {
            for ncol in 1..6 {
                let plan = LayoutPlan::plan(panel_count, ncol).unwrap();
                assert_eq!(plan.slots.len(), panel_count);
                assert!(plan.slots.iter().all(|s| s.col < ncol));
                let per_row = plan
                    .slots
                    .iter()
                    .filter(|s| s.row + 1 == plan.nrow.max(1))
                    .count();
                assert!(per_row <= ncol);
            }
        }
    }

    #[test]
    fn width_share_leaves_gutter_room() {
        assert_eq!(LayoutPlan::plan(2, 1).unwrap().slots[0].width_pct, 99);
        assert_eq!(LayoutPlan::plan(4, 2).unwrap().slots[0].width_pct, 49);
        assert_eq!(LayoutPlan::plan(9, 3).unwrap().slots[0].width_pct, 32);
    }

    #[test]
    fn more_columns_than_panels_lays_one_row() {
        let plan = LayoutPlan::plan(3, 8).unwrap();
        assert_eq!(plan.nrow, 1);
        assert!(plan.slots.iter().all(|s| s.row == 0));
    }

    #[test]
    fn border_defaults_match_host_styling_contract() {
        let plan = LayoutPlan::plan(1, 1).unwrap();
        assert_eq!(plan.border.width_px, 1);
        assert_eq!(plan.border.style, "solid");
        assert_eq!(plan.border.color, "#BEBEBE");
    }
}
