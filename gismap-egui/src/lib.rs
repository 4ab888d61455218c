//! Egui application showing GIS layers selected by the user on a Galileo map.
//!
//! Call [`run`] to start the viewer. The configuration is read from the environment, see
//! [`gismap::config`].

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

use gismap::{GismapError, ViewerConfig};

mod app;
mod map_layers;
mod session;
mod ui;

pub use app::ViewerApp;
pub use map_layers::{build_base_layer, CustomLayers, GalileoLayerSet, TileMessenger};
pub use session::{Session, Startup};
pub use ui::format_count;

/// Starts the viewer with the configuration from the environment.
pub fn run() -> eframe::Result {
    let config = ViewerConfig::from_env().map_err(app_creation_error)?;
    run_with_config(config)
}

/// Starts the viewer with the given configuration.
///
/// Natively, the function returns after the viewer window is closed. In the browser it
/// returns immediately and the viewer runs in the `the_canvas_id` canvas.
pub fn run_with_config(config: ViewerConfig) -> eframe::Result {
    let (map, startup) = Startup::new(config).map_err(app_creation_error)?;

    galileo_egui::InitBuilder::new(map)
        .with_app_builder(move |egui_map_state| Box::new(ViewerApp::new(egui_map_state, startup)))
        .init()
}

fn app_creation_error(err: GismapError) -> eframe::Error {
    eframe::Error::AppCreation(Box::new(err))
}
