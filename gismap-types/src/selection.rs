//! User selection of a state, a city and a set of layers.

use serde::{Deserialize, Serialize};

/// Currently selected state, city and layers.
///
/// The struct is stored as a JSON document, so field names are part of the storage format.
///
/// A consistent selection never has a city without a state, or layers without a city. See
/// [`SelectedLayerData::is_consistent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLayerData {
    /// Slug of the selected state.
    #[serde(default)]
    pub state_slug: Option<String>,
    /// Slug of the selected city.
    #[serde(default)]
    pub city_slug: Option<String>,
    /// Slugs of the selected layers, in the order they were selected.
    #[serde(default)]
    pub layers_slugs: Vec<String>,
    /// Display name of the selected state.
    #[serde(default)]
    pub state_name: Option<String>,
    /// Display name of the selected city.
    #[serde(default)]
    pub city_name: Option<String>,
}

impl SelectedLayerData {
    /// Number of selected layers.
    pub fn selected_layers_count(&self) -> usize {
        self.layers_slugs.len()
    }

    /// Number of selected cities: only one city can be selected at a time.
    pub fn selected_cities_count(&self) -> usize {
        usize::from(self.city_slug.is_some())
    }

    /// Returns true if a state, a city and at least one layer are selected, i.e. there is
    /// something to show on the map.
    pub fn has_any_selections(&self) -> bool {
        self.state_slug.is_some() && self.city_slug.is_some() && !self.layers_slugs.is_empty()
    }

    /// Returns true if the layer with the given slug is selected.
    pub fn is_layer_selected(&self, layer_slug: &str) -> bool {
        self.layers_slugs.iter().any(|slug| slug == layer_slug)
    }

    /// Checks that a city is only set together with a state, and layers only together with a
    /// city.
    pub fn is_consistent(&self) -> bool {
        let city_has_state = self.city_slug.is_none() || self.state_slug.is_some();
        let layers_have_city = self.layers_slugs.is_empty() || self.city_slug.is_some();

        city_has_state && layers_have_city
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.state_slug.is_none() && self.city_slug.is_none() && self.layers_slugs.is_empty()
    }
}
