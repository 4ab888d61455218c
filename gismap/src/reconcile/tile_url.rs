use crate::config::ViewerConfig;

/// Builds URLs of layer tiles:
/// `{tiles_base}/{state_slug}/{city_slug}/{layer_slug}/{z}/{x}/{y}.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlTemplate {
    tiles_base: String,
}

impl TileUrlTemplate {
    /// Creates a template with the given tiles base URL, e.g. `https://host/api/tiles`.
    pub fn new(tiles_base: impl Into<String>) -> Self {
        let tiles_base: String = tiles_base.into();
        Self {
            tiles_base: tiles_base.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a template for the API configured in `config`.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.tiles_base_url())
    }

    /// Tiles base URL.
    pub fn tiles_base(&self) -> &str {
        &self.tiles_base
    }

    /// URL template of the layer with `{z}`, `{x}` and `{y}` placeholders left in place.
    pub fn template(&self, state_slug: &str, city_slug: &str, layer_slug: &str) -> String {
        format!(
            "{}/{state_slug}/{city_slug}/{layer_slug}/{{z}}/{{x}}/{{y}}.png",
            self.tiles_base
        )
    }

    /// URL of a single tile of the layer.
    pub fn tile_url(
        &self,
        state_slug: &str,
        city_slug: &str,
        layer_slug: &str,
        z: u32,
        x: i32,
        y: i32,
    ) -> String {
        expand_template(&self.template(state_slug, city_slug, layer_slug), z, x, y)
    }
}

/// Replaces `{z}`, `{x}` and `{y}` placeholders in the template.
pub fn expand_template(template: &str, z: u32, x: i32, y: i32) -> String {
    template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}
