//! Gismap is the core of a GIS tile viewer: it lets a user pick a state, a city of that state and
//! any number of the city's raster layers, and keeps a map showing exactly the picked layers on
//! top of a base map.
//!
//! # Main components
//!
//! * [`hierarchy`] loads the state -> city -> layer document from the GIS API
//!   (`{api}/api/hierarchy/`) and provides lookups in it.
//! * [`selection`] contains the selection state machine. The state is changed only by
//!   [`SelectionAction`]s, which keep it consistent: choosing a state resets the city and the
//!   layers, choosing a city resets the layers. [`SelectionStore`] persists every change under
//!   the `layerSelections` key and restores it on start.
//! * [`reconcile`] turns the selection into raster tile layers with ids `layer-{slug}` and tile
//!   URLs `{api}/api/tiles/{state}/{city}/{layer}/{z}/{x}/{y}.png`, adding and removing map
//!   layers through the [`MapLayerSet`] trait.
//! * [`config`] reads the viewer configuration from the environment.
//!
//! The crate does not depend on a map engine or a UI toolkit. The `gismap-egui` crate connects
//! it to a `galileo` map shown in an `egui` application.
//!
//! ```
//! use gismap::reconcile::{target_layer_ids, LayerReconciler, TileUrlTemplate};
//! use gismap::selection::{
//!     CityChoice, MemoryStorage, SelectionAction, SelectionStore, StateChoice,
//! };
//!
//! let mut store = SelectionStore::load(MemoryStorage::new());
//! store.dispatch(SelectionAction::SetState(Some(StateChoice {
//!     slug: "telangana".into(),
//!     name: "Telangana".into(),
//! })));
//! store.dispatch(SelectionAction::SetCity(Some(CityChoice {
//!     slug: "hyderabad".into(),
//!     name: "Hyderabad".into(),
//! })));
//! store.dispatch(SelectionAction::ToggleLayer("roads".into()));
//!
//! let ids = target_layer_ids(store.selected());
//! assert!(ids.contains("layer-roads"));
//!
//! let reconciler = LayerReconciler::new(TileUrlTemplate::new("https://gis.example/api/tiles"));
//! assert_eq!(reconciler.template().tiles_base(), "https://gis.example/api/tiles");
//! ```

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod reconcile;
pub mod selection;

mod async_runtime;

pub use config::{BaseMap, ViewerConfig};
pub use error::GismapError;
pub use gismap_types;
pub use hierarchy::{Hierarchy, HierarchyClient, HierarchyLoader, LoadState};
pub use reconcile::{LayerReconciler, MapLayerSet, ReconcileReport, TileLayerSpec};
pub use selection::{SelectionAction, SelectionState, SelectionStore};
