//! Lattice walkthrough: compose a 2x2 grid of map widgets, partition it into
//! two sync groups, and run the deferred bootstrap against a toy host.
//!
//! ```bash
//! cargo run --example lattice_demo
//! ```

use std::collections::HashMap;

use serde_json::json;

use maplattice::{
    LatticeOptions, LinkOptions, MapWidget, Result, SyncSpec, WidgetHost, lattice_view_with,
};

struct DemoInstance {
    id: String,
}

#[derive(Default)]
struct DemoHost {
    mounted: HashMap<String, DemoInstance>,
}

impl DemoHost {
    fn mount(&mut self, id: &str) {
        self.mounted.insert(
            id.to_string(),
            DemoInstance { id: id.to_string() },
        );
    }
}

impl WidgetHost for DemoHost {
    type Handle = DemoInstance;

    fn mounted_instances(&mut self) -> Vec<(String, DemoInstance)> {
        self.mounted.drain().collect()
    }

    fn link(
        &mut self,
        source: &DemoInstance,
        target: &DemoInstance,
        options: LinkOptions,
    ) -> Result<()> {
        println!(
            "  link {} -> {} (cursor: {}, initial sync suppressed: {})",
            source.id, target.id, options.sync_cursor, options.no_initial_sync
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("Lattice demo: 4 map panels, two sync groups\n");

    println!("Step 1: compose the view.");
    let widgets = vec![
        MapWidget::with_id("osm", json!({"tiles": "osm"})),
        MapWidget::with_id("topo", json!({"tiles": "topo"})),
        MapWidget::with_id("satellite", json!({"tiles": "satellite"})),
        MapWidget::with_id("terrain", json!({"tiles": "terrain"})),
    ];
    let options = LatticeOptions::lattice()
        .with_sync(SyncSpec::Groups(vec![vec![0, 1], vec![2, 3]]))
        .with_sync_cursor(true);
    let view = lattice_view_with(widgets, options)?;

    println!(
        "  {} panels in {} rows x {} cols, {} link commands\n",
        view.panel_count(),
        view.layout.nrow,
        view.layout.ncol,
        view.link_count()
    );

    println!("Step 2: the script the host templating layer receives.");
    println!("{}\n", view.script.to_json()?);

    println!("Step 3: mount three of four widgets and run the bootstrap once.");
    let mut host = DemoHost::default();
    host.mount("osm");
    host.mount("topo");
    host.mount("satellite");

    let report = view.bootstrap().run(&mut host);
    println!(
        "\n  mounted: {}, applied: {}, skipped: {} (terrain never mounted)",
        report.mounted, report.applied, report.skipped
    );

    Ok(())
}
