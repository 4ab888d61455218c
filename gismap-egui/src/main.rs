//! Native GIS layer viewer.
//!
//! Logging is configured with the `RUST_LOG` variable, the viewer itself with the `GISMAP_*`
//! variables described in [`gismap::config`].

fn main() -> eframe::Result {
    gismap_egui::run()
}
