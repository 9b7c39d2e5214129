use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};
use crate::panel::PanelSet;

use super::SyncGroup;

/// Options carried by every link command. Booleans stay typed through the
/// whole pipeline; stringification belongs to the host serialization layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOptions {
    /// Propagate the pointer position across linked panels.
    pub sync_cursor: bool,
    /// Suppress the immediate view alignment at link time.
    pub no_initial_sync: bool,
}

/// One directed instruction: make panel `source_id` follow view changes of
/// panel `target_id`. Both directions of a pair are emitted whenever both
/// members sit in the same group, so the link is bidirectional in effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCommand {
    pub source_id: String,
    pub target_id: String,
    pub sync_cursor: bool,
    pub no_initial_sync: bool,
}

impl LinkCommand {
    /// Expand groups into the full set of ordered, self-excluding pairs.
    ///
    /// Per group this is the Cartesian product of the member list with
    /// itself, minus pairs over the same panel index: a group of k distinct
    /// members yields exactly `k * (k - 1)` commands. Groups are expanded in
    /// spec order, pairs in row-major order of the member list, and commands
    /// from overlapping groups are unioned without deduplication.
    pub fn generate(
        groups: &[SyncGroup],
        panels: &PanelSet,
        options: LinkOptions,
    ) -> Result<Vec<LinkCommand>> {
        let mut commands = Vec::new();
        for group in groups {
            for &a in group.members() {
                for &b in group.members() {
                    if a == b {
                        continue;
                    }
                    let source_id = lookup(panels, a)?;
                    let target_id = lookup(panels, b)?;
                    commands.push(LinkCommand {
                        source_id,
                        target_id,
                        sync_cursor: options.sync_cursor,
                        no_initial_sync: options.no_initial_sync,
                    });
                }
            }
        }
        Ok(commands)
    }

    pub fn options(&self) -> LinkOptions {
        LinkOptions {
            sync_cursor: self.sync_cursor,
            no_initial_sync: self.no_initial_sync,
        }
    }
}

fn lookup(panels: &PanelSet, index: usize) -> Result<String> {
    panels
        .id_of(index)
        .map(str::to_string)
        .ok_or(LatticeError::PanelIndexOutOfRange {
            index,
            panel_count: panels.len(),
        })
}
