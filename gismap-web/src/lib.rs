//! Browser entry point of the gismap viewer.
//!
//! The page must contain a canvas with the `the_canvas_id` id, see `index.html`. Build-time
//! environment variables configure the viewer, for example
//! `GISMAP_API_URL=http://localhost:8000 wasm-pack build --target web gismap-web`.

use wasm_bindgen::prelude::*;

/// Starts the viewer.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Redirect `log` messages to the browser console. Fails only if a logger is already set.
    console_log::init_with_level(log::Level::Info).ok();

    if let Err(err) = gismap_egui::run() {
        log::error!("Failed to start the viewer: {err}");
    }
}
