//! Viewer startup and the per-frame layer synchronization.
//!
//! The map is created before the egui application, but the redraw messenger of runtime layers
//! and the repaint callback of the hierarchy loader need the egui context. So the viewer starts
//! in two steps: [`Startup::new`] builds the map with the base layer, and [`Startup::start`],
//! called with the context of the first frame, creates the [`Session`].

use galileo::{Map, MapBuilder};
use gismap::config::BaseMap;
use gismap::hierarchy::{HierarchyClient, HierarchyLoader};
use gismap::reconcile::{LayerReconciler, ReconcileReport, TileUrlTemplate};
use gismap::selection::default_storage;
use gismap::{GismapError, SelectionStore, ViewerConfig};

use crate::map_layers::{build_base_layer, CustomLayers, GalileoLayerSet, TileMessenger};

/// Everything prepared before the egui application is running.
pub struct Startup {
    config: ViewerConfig,
    client: HierarchyClient,
    reconciler: LayerReconciler,
    // Natively the logger is installed together with the window, so problems found while
    // building the map are logged when the session starts.
    deferred_errors: Vec<String>,
}

impl Startup {
    /// Creates the map with the base layer and prepares the session.
    ///
    /// A base map that cannot be used (for example Mapbox without a token) is replaced with
    /// Open Street Map. If the base layer cannot be created at all, the map starts without it.
    pub fn new(config: ViewerConfig) -> Result<(Map, Self), GismapError> {
        let client = HierarchyClient::new(&config)?;
        let reconciler = LayerReconciler::new(TileUrlTemplate::from_config(&config));
        let mut deferred_errors = Vec::new();

        let base_map = config.base_map().unwrap_or_else(|err| {
            deferred_errors.push(format!("{err}, using OpenStreetMap base map"));
            BaseMap::Osm
        });

        let mut builder = MapBuilder::default()
            .with_latlon(config.center_lat, config.center_lng)
            .with_z_level(config.zoom);
        match build_base_layer(base_map, &config.tile_cache_dir) {
            Ok(base_layer) => builder = builder.with_layer(base_layer),
            Err(err) => deferred_errors.push(format!("Base map is not available: {err}")),
        }

        let startup = Self {
            config,
            client,
            reconciler,
            deferred_errors,
        };

        Ok((builder.build(), startup))
    }

    /// Restores the stored selection and starts loading the hierarchy.
    pub fn start(self, ctx: &egui::Context) -> Session {
        for message in &self.deferred_errors {
            log::warn!("{message}");
        }

        log::info!(
            "Viewer started with API {} at ({}, {}), zoom {}",
            self.config.api_base_url,
            self.config.center_lat,
            self.config.center_lng,
            self.config.zoom
        );

        let store = SelectionStore::load(default_storage(&self.config));

        let repaint_ctx = ctx.clone();
        let loader = HierarchyLoader::new(self.client, move || repaint_ctx.request_repaint());
        loader.start();

        Session {
            store,
            loader,
            reconciler: self.reconciler,
            custom_layers: CustomLayers::default(),
            messenger: TileMessenger::new(ctx.clone()),
            applied_revision: None,
            last_report: ReconcileReport::default(),
        }
    }
}

/// Selection, hierarchy and the layers added to the map for the selection.
pub struct Session {
    store: SelectionStore,
    loader: HierarchyLoader,
    reconciler: LayerReconciler,
    custom_layers: CustomLayers,
    messenger: TileMessenger,
    applied_revision: Option<u64>,
    last_report: ReconcileReport,
}

impl Session {
    /// Brings the map layers in line with the selection.
    ///
    /// Nothing is done if the selection did not change since the last call, unless `rebuild`
    /// is set: then all layers are recreated even if they are already on the map. Returns true
    /// if the map layers were changed.
    pub fn sync_layers(&mut self, map: &mut Map, rebuild: bool) -> bool {
        if !rebuild && self.applied_revision == Some(self.store.revision()) {
            return false;
        }

        let mut layers =
            GalileoLayerSet::new(map, &mut self.custom_layers, Some(self.messenger.clone()));
        let selection = self.store.selected();
        let report = if rebuild {
            self.reconciler.rebuild(selection, &mut layers)
        } else {
            self.reconciler.reconcile(selection, &mut layers)
        };

        let changed = !report.is_noop();
        if changed {
            log::info!(
                "Map layers updated: {} added, {} removed, {} failed",
                report.added.len(),
                report.removed.len(),
                report.failures.len()
            );
        }

        self.last_report = report;
        self.applied_revision = Some(self.store.revision());

        changed
    }

    /// Selection store.
    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Mutable access to the selection store.
    pub fn store_mut(&mut self) -> &mut SelectionStore {
        &mut self.store
    }

    /// Hierarchy loader.
    pub fn loader(&self) -> &HierarchyLoader {
        &self.loader
    }

    /// Layers added for the selection.
    pub fn custom_layers(&self) -> &CustomLayers {
        &self.custom_layers
    }

    /// Report of the last synchronization.
    pub fn last_report(&self) -> &ReconcileReport {
        &self.last_report
    }

    /// Returns true if a layer loaded tiles since the last call.
    pub fn take_redraw_request(&self) -> bool {
        self.messenger.take_redraw_request()
    }
}
