//! Synchronization of the map layers with the layer selection.
//!
//! Every selected layer is shown on the map as a raster tile layer with the id
//! `layer-{layer_slug}` (and a tile source `source-{layer_slug}` for map libraries that
//! distinguish sources from layers). The [`LayerReconciler`] compares these ids with the ids of
//! the layers the map currently has and issues the add/remove calls needed to make them match.
//!
//! The map library is abstracted by the [`MapLayerSet`] trait. Layers with ids not starting with
//! `layer-`, like the base map, are never touched.

use std::collections::BTreeSet;

use gismap_types::SelectedLayerData;
use log::{debug, error};

use crate::error::GismapError;

mod tile_url;

pub use tile_url::{expand_template, TileUrlTemplate};

/// Prefix of the ids of layers managed by the reconciler.
pub const LAYER_ID_PREFIX: &str = "layer-";
/// Prefix of the ids of tile sources managed by the reconciler.
pub const SOURCE_ID_PREFIX: &str = "source-";

/// Id of the map layer showing the layer with the given slug.
pub fn layer_id(layer_slug: &str) -> String {
    format!("{LAYER_ID_PREFIX}{layer_slug}")
}

/// Id of the tile source of the layer with the given slug.
pub fn source_id(layer_slug: &str) -> String {
    format!("{SOURCE_ID_PREFIX}{layer_slug}")
}

/// Extracts the layer slug from a map layer id. Returns `None` if the layer is not managed by
/// the reconciler.
pub fn slug_from_layer_id(layer_id: &str) -> Option<&str> {
    layer_id.strip_prefix(LAYER_ID_PREFIX)
}

/// Display parameters of a layer tile layer.
///
/// A map backend applies what it supports. `min_zoom` and `opacity` are hints: the galileo
/// raster tile layer has no setting for either, so the galileo layer set ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerOptions {
    /// Size of a tile in pixels.
    pub tile_size: u32,
    /// Minimum zoom level tiles are available for. Hint only.
    pub min_zoom: u32,
    /// Maximum zoom level tiles are available for.
    pub max_zoom: u32,
    /// Opacity of the layer. Hint only.
    pub opacity: f32,
    /// Attribution text shown for the layer.
    pub attribution: String,
}

impl TileLayerOptions {
    /// Default options for the layer with the given slug.
    pub fn for_layer(layer_slug: &str) -> Self {
        Self {
            tile_size: 256,
            min_zoom: 8,
            max_zoom: 18,
            opacity: 0.8,
            attribution: format!("Layer: {layer_slug}"),
        }
    }
}

/// Everything a map needs to add a tile layer for a selected layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerSpec {
    /// Map layer id, `layer-{slug}`.
    pub layer_id: String,
    /// Tile source id, `source-{slug}`.
    pub source_id: String,
    /// Slug of the state the layer belongs to.
    pub state_slug: String,
    /// Slug of the city the layer belongs to.
    pub city_slug: String,
    /// Slug of the layer.
    pub layer_slug: String,
    /// Tile URL with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Display parameters.
    pub options: TileLayerOptions,
}

impl TileLayerSpec {
    /// Creates a spec for a layer of the given city.
    pub fn new(
        template: &TileUrlTemplate,
        state_slug: &str,
        city_slug: &str,
        layer_slug: &str,
    ) -> Self {
        Self {
            layer_id: layer_id(layer_slug),
            source_id: source_id(layer_slug),
            state_slug: state_slug.to_string(),
            city_slug: city_slug.to_string(),
            layer_slug: layer_slug.to_string(),
            url_template: template.template(state_slug, city_slug, layer_slug),
            options: TileLayerOptions::for_layer(layer_slug),
        }
    }

    /// URL of a single tile of the layer.
    pub fn tile_url(&self, z: u32, x: i32, y: i32) -> String {
        expand_template(&self.url_template, z, x, y)
    }
}

/// Layers of a live map as seen by the reconciler.
pub trait MapLayerSet {
    /// Ids of the layers currently on the map. Ids not starting with [`LAYER_ID_PREFIX`] are
    /// ignored by the reconciler.
    fn custom_layer_ids(&self) -> Vec<String>;
    /// Returns true if the map has a layer with the given id.
    fn has_layer(&self, layer_id: &str) -> bool;
    /// Adds a tile layer described by the spec.
    fn add_tile_layer(&mut self, spec: &TileLayerSpec) -> Result<(), GismapError>;
    /// Removes the layer (and its tile source) with the given id.
    fn remove_layer(&mut self, layer_id: &str) -> Result<(), GismapError>;
}

/// Operations needed to bring the map in line with the selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Ids of the layers to remove.
    pub remove: Vec<String>,
    /// Layers to add, in selection order.
    pub add: Vec<TileLayerSpec>,
}

impl ReconcilePlan {
    /// Returns true if the map already matches the selection.
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Computes the operations that turn `active_ids` into the layers of the selection.
///
/// Layers are shown only if a state, a city and at least one layer are selected. Otherwise
/// every managed layer is removed.
pub fn plan(
    selection: &SelectedLayerData,
    active_ids: &[String],
    template: &TileUrlTemplate,
) -> ReconcilePlan {
    let managed = active_ids
        .iter()
        .filter(|id| slug_from_layer_id(id).is_some());

    let (Some(state_slug), Some(city_slug)) = (&selection.state_slug, &selection.city_slug)
    else {
        return ReconcilePlan {
            remove: managed.cloned().collect(),
            add: vec![],
        };
    };
    if selection.layers_slugs.is_empty() {
        return ReconcilePlan {
            remove: managed.cloned().collect(),
            add: vec![],
        };
    }

    let remove = managed
        .filter(|id| {
            slug_from_layer_id(id).is_some_and(|slug| !selection.is_layer_selected(slug))
        })
        .cloned()
        .collect();

    let mut seen = BTreeSet::new();
    let add = selection
        .layers_slugs
        .iter()
        .filter(|slug| seen.insert(slug.as_str()))
        .filter(|slug| !active_ids.contains(&layer_id(slug)))
        .map(|slug| TileLayerSpec::new(template, state_slug, city_slug, slug))
        .collect();

    ReconcilePlan { remove, add }
}

/// Ids of the layers the map should have for the selection.
pub fn target_layer_ids(selection: &SelectedLayerData) -> BTreeSet<String> {
    if !selection.has_any_selections() {
        return BTreeSet::new();
    }

    selection
        .layers_slugs
        .iter()
        .map(|slug| layer_id(slug))
        .collect()
}

/// Map operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOperation {
    /// Adding a layer.
    Add,
    /// Removing a layer.
    Remove,
}

/// Map operation that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFailure {
    /// Id of the layer.
    pub layer_id: String,
    /// Failed operation.
    pub operation: LayerOperation,
    /// Error message.
    pub message: String,
}

/// Result of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids of removed layers.
    pub removed: Vec<String>,
    /// Ids of added layers.
    pub added: Vec<String>,
    /// Operations that failed.
    pub failures: Vec<LayerFailure>,
}

impl ReconcileReport {
    /// Returns true if nothing was changed and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.failures.is_empty()
    }

    fn merge(&mut self, other: ReconcileReport) {
        self.removed.extend(other.removed);
        self.added.extend(other.added);
        self.failures.extend(other.failures);
    }
}

/// Keeps the map layers in sync with the selection.
#[derive(Debug, Clone)]
pub struct LayerReconciler {
    template: TileUrlTemplate,
    applied_location: Option<(String, String)>,
}

impl LayerReconciler {
    /// Creates a reconciler building tile URLs with the given template.
    pub fn new(template: TileUrlTemplate) -> Self {
        Self {
            template,
            applied_location: None,
        }
    }

    /// Tile URL template.
    pub fn template(&self) -> &TileUrlTemplate {
        &self.template
    }

    /// Adds and removes map layers so that the map shows exactly the selected layers.
    ///
    /// Removals are done before additions. Every operation is checked against the current map
    /// state first, so calling this again with the same selection does nothing. Failed
    /// operations are logged and reported, the rest of the operations still run.
    pub fn reconcile<M: MapLayerSet + ?Sized>(
        &mut self,
        selection: &SelectedLayerData,
        map: &mut M,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        // Tile URLs depend on the state and the city, so layers of another location cannot be
        // reused even if the slugs match.
        let location = match (&selection.state_slug, &selection.city_slug) {
            (Some(state), Some(city)) => Some((state.clone(), city.clone())),
            _ => None,
        };
        if self.applied_location.is_some() && self.applied_location != location {
            debug!("Selected location changed, dropping all layers");
            report.merge(Self::remove_all(map));
        }

        let active_ids = map.custom_layer_ids();
        let plan = plan(selection, &active_ids, &self.template);

        for id in &plan.remove {
            if !map.has_layer(id) {
                continue;
            }

            debug!("Removing unselected layer: {id}");
            match map.remove_layer(id) {
                Ok(()) => report.removed.push(id.clone()),
                Err(err) => {
                    error!("Error removing layer {id}: {err}");
                    report.failures.push(LayerFailure {
                        layer_id: id.clone(),
                        operation: LayerOperation::Remove,
                        message: err.to_string(),
                    });
                }
            }
        }

        for spec in &plan.add {
            if map.has_layer(&spec.layer_id) {
                continue;
            }

            debug!(
                "Adding layer: {} with source: {}",
                spec.layer_id, spec.source_id
            );
            match map.add_tile_layer(spec) {
                Ok(()) => report.added.push(spec.layer_id.clone()),
                Err(err) => {
                    error!("Error adding layer {}: {err}", spec.layer_slug);
                    report.failures.push(LayerFailure {
                        layer_id: spec.layer_id.clone(),
                        operation: LayerOperation::Add,
                        message: err.to_string(),
                    });
                }
            }
        }

        self.applied_location = if selection.has_any_selections() {
            location
        } else {
            None
        };

        report
    }

    /// Removes all managed layers and adds the selected ones again.
    pub fn rebuild<M: MapLayerSet + ?Sized>(
        &mut self,
        selection: &SelectedLayerData,
        map: &mut M,
    ) -> ReconcileReport {
        let mut report = Self::remove_all(map);
        report.merge(self.reconcile(selection, map));
        report
    }

    fn remove_all<M: MapLayerSet + ?Sized>(map: &mut M) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for id in map.custom_layer_ids() {
            if slug_from_layer_id(&id).is_none() || !map.has_layer(&id) {
                continue;
            }

            match map.remove_layer(&id) {
                Ok(()) => report.removed.push(id),
                Err(err) => {
                    error!("Error removing layer {id}: {err}");
                    report.failures.push(LayerFailure {
                        layer_id: id,
                        operation: LayerOperation::Remove,
                        message: err.to_string(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    const BASE_LAYER: &str = "osm-base";

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(String, String),
        Remove(String),
    }

    /// Map double recording every call.
    #[derive(Default)]
    struct RecordingLayerSet {
        ids: Vec<String>,
        calls: Vec<Call>,
        failing: HashSet<String>,
    }

    impl RecordingLayerSet {
        fn with_base_layer() -> Self {
            Self {
                ids: vec![BASE_LAYER.to_string()],
                ..Default::default()
            }
        }

        fn custom_ids(&self) -> BTreeSet<String> {
            self.ids
                .iter()
                .filter(|id| slug_from_layer_id(id).is_some())
                .cloned()
                .collect()
        }
    }

    impl MapLayerSet for RecordingLayerSet {
        fn custom_layer_ids(&self) -> Vec<String> {
            self.ids.clone()
        }

        fn has_layer(&self, layer_id: &str) -> bool {
            self.ids.iter().any(|id| id == layer_id)
        }

        fn add_tile_layer(&mut self, spec: &TileLayerSpec) -> Result<(), GismapError> {
            if self.failing.contains(&spec.layer_id) {
                return Err(GismapError::Map(format!("cannot add {}", spec.layer_id)));
            }
            if self.has_layer(&spec.layer_id) {
                return Err(GismapError::Map("duplicate layer".into()));
            }

            self.calls
                .push(Call::Add(spec.layer_id.clone(), spec.url_template.clone()));
            self.ids.push(spec.layer_id.clone());
            Ok(())
        }

        fn remove_layer(&mut self, layer_id: &str) -> Result<(), GismapError> {
            if self.failing.contains(layer_id) {
                return Err(GismapError::Map(format!("cannot remove {layer_id}")));
            }

            self.calls.push(Call::Remove(layer_id.to_string()));
            self.ids.retain(|id| id != layer_id);
            Ok(())
        }
    }

    fn selection(state: Option<&str>, city: Option<&str>, layers: &[&str]) -> SelectedLayerData {
        SelectedLayerData {
            state_slug: state.map(str::to_string),
            city_slug: city.map(str::to_string),
            layers_slugs: layers.iter().map(|s| s.to_string()).collect(),
            state_name: None,
            city_name: None,
        }
    }

    fn reconciler() -> LayerReconciler {
        LayerReconciler::new(TileUrlTemplate::new("https://gis.test/api/tiles"))
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn layer_ids() {
        assert_eq!(layer_id("roads"), "layer-roads");
        assert_eq!(source_id("roads"), "source-roads");
        assert_eq!(slug_from_layer_id("layer-roads"), Some("roads"));
        assert_eq!(slug_from_layer_id("layer-"), Some(""));
        assert_eq!(slug_from_layer_id(BASE_LAYER), None);
        assert_eq!(slug_from_layer_id("source-roads"), None);
    }

    #[test]
    fn target_ids_of_full_selection() {
        let selection = selection(Some("TS"), Some("hyderabad"), &["roads", "water"]);
        assert_eq!(
            target_layer_ids(&selection),
            ids(&["layer-roads", "layer-water"])
        );
    }

    #[test]
    fn target_ids_of_partial_selection_are_empty() {
        assert!(target_layer_ids(&selection(Some("TS"), None, &[])).is_empty());
        assert!(target_layer_ids(&selection(Some("TS"), Some("hyderabad"), &[])).is_empty());
        assert!(target_layer_ids(&SelectedLayerData::default()).is_empty());
    }

    #[test]
    fn plan_adds_missing_and_removes_unselected() {
        let template = TileUrlTemplate::new("https://gis.test/api/tiles");
        let active = vec![
            BASE_LAYER.to_string(),
            "layer-roads".to_string(),
            "layer-parks".to_string(),
        ];

        let plan = plan(
            &selection(Some("TS"), Some("hyderabad"), &["water", "roads"]),
            &active,
            &template,
        );

        assert_eq!(plan.remove, ["layer-parks"]);
        assert_eq!(plan.add.len(), 1);
        let spec = &plan.add[0];
        assert_eq!(spec.layer_id, "layer-water");
        assert_eq!(spec.source_id, "source-water");
        assert_eq!(
            spec.url_template,
            "https://gis.test/api/tiles/TS/hyderabad/water/{z}/{x}/{y}.png"
        );
        assert_eq!(
            spec.tile_url(14, 11765, 7473),
            "https://gis.test/api/tiles/TS/hyderabad/water/14/11765/7473.png"
        );
        assert_eq!(spec.options.tile_size, 256);
        assert_eq!(spec.options.min_zoom, 8);
        assert_eq!(spec.options.max_zoom, 18);
        assert_eq!(spec.options.attribution, "Layer: water");
    }

    #[test]
    fn plan_without_full_selection_removes_everything() {
        let template = TileUrlTemplate::new("https://gis.test/api/tiles");
        let active = vec![BASE_LAYER.to_string(), "layer-roads".to_string()];

        let plan = plan(&selection(Some("TS"), None, &[]), &active, &template);

        assert_eq!(plan.remove, ["layer-roads"]);
        assert!(plan.add.is_empty());
    }

    #[test]
    fn plan_ignores_duplicate_slugs() {
        let template = TileUrlTemplate::new("https://gis.test/api/tiles");
        let plan = plan(
            &selection(Some("TS"), Some("hyderabad"), &["roads", "roads"]),
            &[],
            &template,
        );
        assert_eq!(plan.add.len(), 1);
    }

    #[test]
    fn reconcile_reaches_target_set() {
        let selection = selection(Some("TS"), Some("hyderabad"), &["roads", "water"]);
        let mut map = RecordingLayerSet::with_base_layer();

        let report = reconciler().reconcile(&selection, &mut map);

        assert_eq!(report.added, ["layer-roads", "layer-water"]);
        assert!(report.removed.is_empty());
        assert_eq!(map.custom_ids(), target_layer_ids(&selection));
        assert!(map.has_layer(BASE_LAYER));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let selection = selection(Some("TS"), Some("hyderabad"), &["roads", "water"]);
        let mut map = RecordingLayerSet::with_base_layer();
        let mut reconciler = reconciler();

        reconciler.reconcile(&selection, &mut map);
        let ids_after_first = map.custom_ids();
        let calls_after_first = map.calls.len();

        let report = reconciler.reconcile(&selection, &mut map);

        assert!(report.is_noop());
        assert_eq!(map.custom_ids(), ids_after_first);
        assert_eq!(map.calls.len(), calls_after_first);
    }

    #[test]
    fn reconcile_removes_before_adding() {
        let mut map = RecordingLayerSet::with_base_layer();
        let mut reconciler = reconciler();

        reconciler.reconcile(
            &selection(Some("TS"), Some("hyderabad"), &["roads"]),
            &mut map,
        );
        map.calls.clear();

        reconciler.reconcile(
            &selection(Some("TS"), Some("hyderabad"), &["water"]),
            &mut map,
        );

        assert_eq!(
            map.calls,
            [
                Call::Remove("layer-roads".into()),
                Call::Add(
                    "layer-water".into(),
                    "https://gis.test/api/tiles/TS/hyderabad/water/{z}/{x}/{y}.png".into()
                ),
            ]
        );
    }

    #[test]
    fn empty_selection_removes_all_managed_layers() {
        let mut map = RecordingLayerSet::with_base_layer();
        let mut reconciler = reconciler();

        reconciler.reconcile(
            &selection(Some("TS"), Some("hyderabad"), &["roads", "water"]),
            &mut map,
        );
        let report = reconciler.reconcile(&SelectedLayerData::default(), &mut map);

        assert_eq!(report.removed.len(), 2);
        assert!(map.custom_ids().is_empty());
        assert_eq!(map.ids, [BASE_LAYER]);
    }

    #[test]
    fn location_change_reloads_layers() {
        let mut map = RecordingLayerSet::with_base_layer();
        let mut reconciler = reconciler();

        reconciler.reconcile(
            &selection(Some("TS"), Some("hyderabad"), &["roads"]),
            &mut map,
        );
        map.calls.clear();

        reconciler.reconcile(
            &selection(Some("TS"), Some("warangal"), &["roads"]),
            &mut map,
        );

        assert_eq!(
            map.calls,
            [
                Call::Remove("layer-roads".into()),
                Call::Add(
                    "layer-roads".into(),
                    "https://gis.test/api/tiles/TS/warangal/roads/{z}/{x}/{y}.png".into()
                ),
            ]
        );
    }

    #[test]
    fn failures_are_reported_and_do_not_stop_reconciliation() {
        let mut map = RecordingLayerSet::with_base_layer();
        map.failing.insert("layer-roads".into());

        let report = reconciler().reconcile(
            &selection(Some("TS"), Some("hyderabad"), &["roads", "water"]),
            &mut map,
        );

        assert_eq!(report.added, ["layer-water"]);
        assert_eq!(report.failures.len(), 1);
        assert_matches!(
            &report.failures[0],
            LayerFailure { layer_id, operation: LayerOperation::Add, .. } if layer_id == "layer-roads"
        );
        assert_eq!(map.custom_ids(), ids(&["layer-water"]));
    }

    #[test]
    fn rebuild_replaces_all_layers() {
        let selection = selection(Some("TS"), Some("hyderabad"), &["roads", "water"]);
        let mut map = RecordingLayerSet::with_base_layer();
        let mut reconciler = reconciler();

        reconciler.reconcile(&selection, &mut map);
        let report = reconciler.rebuild(&selection, &mut map);

        assert_eq!(report.removed, ["layer-roads", "layer-water"]);
        assert_eq!(report.added, ["layer-roads", "layer-water"]);
        assert_eq!(map.custom_ids(), target_layer_ids(&selection));
    }
}
