//! Galileo side of the layer reconciliation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use galileo::layer::raster_tile_layer::RasterTileLayerBuilder;
use galileo::layer::RasterTileLayer;
use galileo::tile_schema::TileIndex;
use galileo::{Lod, Map, Messenger, TileSchema};
use gismap::config::BaseMap;
use gismap::reconcile::{MapLayerSet, TileLayerOptions, TileLayerSpec};
use gismap::GismapError;

/// Messenger of the layers added at runtime.
///
/// Layers added after the map state was created do not know about the egui map messenger, so
/// they report loaded tiles here. The app checks the flag every frame and requests a map redraw.
#[derive(Clone)]
pub struct TileMessenger {
    context: egui::Context,
    requires_redraw: Arc<AtomicBool>,
}

impl TileMessenger {
    /// Creates a messenger repainting the given context.
    pub fn new(context: egui::Context) -> Self {
        Self {
            context,
            requires_redraw: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true if a layer requested a redraw since the last call.
    pub fn take_redraw_request(&self) -> bool {
        self.requires_redraw.swap(false, Ordering::Relaxed)
    }
}

impl Messenger for TileMessenger {
    fn request_redraw(&self) {
        log::trace!("Redraw requested by a layer tile");
        self.requires_redraw.store(true, Ordering::Relaxed);
        self.context.request_repaint();
    }
}

/// Ids of the layers added by the reconciler, in the order of the map layer collection.
///
/// Galileo layers have no ids, so the registry is the only link between a layer id and a layer.
/// Custom layers are always the last layers of the collection, above the base map.
#[derive(Debug, Default, Clone)]
pub struct CustomLayers {
    ids: Vec<String>,
}

impl CustomLayers {
    /// Ids of the custom layers, bottom to top.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of custom layers on the map.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no custom layers are on the map.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn position(&self, layer_id: &str) -> Option<usize> {
        self.ids.iter().position(|id| id == layer_id)
    }
}

/// [`MapLayerSet`] over the layers of a galileo map.
pub struct GalileoLayerSet<'a> {
    map: &'a mut Map,
    custom: &'a mut CustomLayers,
    messenger: Option<TileMessenger>,
}

impl<'a> GalileoLayerSet<'a> {
    /// Creates a layer set. Layers added to the map will notify the `messenger` about loaded
    /// tiles.
    pub fn new(
        map: &'a mut Map,
        custom: &'a mut CustomLayers,
        messenger: Option<TileMessenger>,
    ) -> Self {
        Self {
            map,
            custom,
            messenger,
        }
    }

    fn base_layers_count(&self) -> usize {
        self.map.layers().len().saturating_sub(self.custom.len())
    }
}

impl MapLayerSet for GalileoLayerSet<'_> {
    fn custom_layer_ids(&self) -> Vec<String> {
        self.custom.ids.clone()
    }

    fn has_layer(&self, layer_id: &str) -> bool {
        self.custom.position(layer_id).is_some()
    }

    fn add_tile_layer(&mut self, spec: &TileLayerSpec) -> Result<(), GismapError> {
        if self.has_layer(&spec.layer_id) {
            return Err(GismapError::Map(format!(
                "layer {} is already on the map",
                spec.layer_id
            )));
        }

        let layer = build_tile_layer(spec, self.messenger.clone())?;
        self.map.layers_mut().push(layer);
        self.custom.ids.push(spec.layer_id.clone());

        Ok(())
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<(), GismapError> {
        let Some(position) = self.custom.position(layer_id) else {
            return Err(GismapError::Map(format!("layer {layer_id} is not on the map")));
        };

        let index = self.base_layers_count() + position;
        if index >= self.map.layers().len() {
            return Err(GismapError::Map(format!(
                "layer {layer_id} is missing from the map layer collection"
            )));
        }

        self.map.layers_mut().remove(index);
        self.custom.ids.remove(position);

        Ok(())
    }
}

fn build_tile_layer(
    spec: &TileLayerSpec,
    messenger: Option<TileMessenger>,
) -> Result<RasterTileLayer, GismapError> {
    let template = spec.url_template.clone();
    let mut builder = RasterTileLayerBuilder::new_rest(move |index: &TileIndex| {
        gismap::reconcile::expand_template(&template, index.z, index.x, index.y)
    })
    .with_tile_schema(tile_schema(&spec.options))
    .with_attribution(spec.options.attribution.clone(), spec.url_template.clone());

    if let Some(messenger) = messenger {
        builder = builder.with_messenger(messenger);
    }

    builder
        .build()
        .map_err(|err| GismapError::Map(format!("failed to create layer {}: {err}", spec.layer_id)))
}

/// Web Mercator schema with levels `0..=max_zoom` of square `tile_size` tiles.
///
/// Level `z` keeps the resolution of the XYZ scheme, so the tile indices match the tile URLs for
/// any tile size.
fn tile_schema(options: &TileLayerOptions) -> TileSchema {
    let mut schema = TileSchema::web(options.max_zoom + 1);
    let tile_size = options.tile_size.max(1);
    if tile_size != schema.tile_width {
        let scale = f64::from(schema.tile_width) / f64::from(tile_size);
        schema.lods = schema
            .lods
            .iter()
            .filter_map(|lod| Lod::new(lod.resolution() * scale, lod.z_index()))
            .collect();
        schema.tile_width = tile_size;
        schema.tile_height = tile_size;
    }

    schema
}

/// Creates the base map layer. Tiles are cached in `cache_dir` on native platforms.
///
/// The layer gets its messenger from the egui map state when the app is created.
pub fn build_base_layer(
    base_map: BaseMap,
    cache_dir: &std::path::Path,
) -> Result<RasterTileLayer, GismapError> {
    let (text, url) = base_map.attribution();

    RasterTileLayerBuilder::new_rest(move |index: &TileIndex| {
        base_map.tile_url(index.z, index.x, index.y)
    })
    .with_file_cache_checked(cache_dir)
    .with_attribution(text.to_string(), url.to_string())
    .build()
    .map_err(|err| GismapError::Map(format!("failed to create base layer: {err}")))
}
