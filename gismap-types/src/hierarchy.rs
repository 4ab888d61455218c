//! State -> city -> layer hierarchy as returned by the GIS API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status value of a successful hierarchy response.
pub const STATUS_SUCCESS: &str = "success";

/// Top level document of the hierarchy endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyResponse {
    /// Status string reported by the API, `"success"` for a valid response.
    #[serde(default)]
    pub status: String,
    /// Number of states as reported by the API.
    #[serde(default)]
    pub total_states: u64,
    /// States with their cities.
    #[serde(default)]
    pub hierarchy: Vec<StateData>,
}

impl HierarchyResponse {
    /// Returns true if the API reported success.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Aggregated counts over all states.
    ///
    /// The number of states is taken from the response as is, the other values are sums of
    /// per-state statistics.
    pub fn total_statistics(&self) -> TotalStatistics {
        self.hierarchy.iter().fold(
            TotalStatistics {
                total_states: self.total_states,
                ..Default::default()
            },
            |mut acc, state_data| {
                acc.total_cities += state_data.statistics.total_cities;
                acc.total_layers += state_data.statistics.total_layers;
                acc.total_features += state_data.statistics.total_features;
                acc
            },
        )
    }
}

/// Aggregate counts over the whole hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalStatistics {
    /// Number of states.
    pub total_states: u64,
    /// Number of cities.
    pub total_cities: u64,
    /// Number of layers.
    pub total_layers: u64,
    /// Number of features in all layers.
    pub total_features: u64,
}

/// A state with its statistics and cities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    /// State description.
    pub state: State,
    /// Counts reported for the state.
    #[serde(default)]
    pub statistics: StateStatistics,
    /// Cities of the state.
    #[serde(default)]
    pub cities: Vec<City>,
}

/// A state (top level of the hierarchy).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Display name.
    pub name: String,
    /// URL-safe identifier.
    pub slug: String,
    /// Short state code, e.g. `TS`.
    #[serde(default)]
    pub code: String,
    /// Latitude of the state center, if known.
    #[serde(default)]
    pub center_lat: Option<f64>,
    /// Longitude of the state center, if known.
    #[serde(default)]
    pub center_lng: Option<f64>,
    /// Whether the state is enabled in the API.
    #[serde(default)]
    pub is_active: bool,
}

/// Counts reported for a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateStatistics {
    /// Number of cities in the state.
    pub total_cities: u64,
    /// Number of layers in all cities of the state.
    pub total_layers: u64,
    /// Number of features in all layers of the state.
    pub total_features: u64,
}

/// A city of a state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display name.
    pub name: String,
    /// URL-safe identifier, unique within the state.
    pub slug: String,
    /// Latitude of the city center.
    #[serde(default)]
    pub center_lat: f64,
    /// Longitude of the city center.
    #[serde(default)]
    pub center_lng: f64,
    /// Whether the city is enabled in the API.
    #[serde(default)]
    pub is_active: bool,
    /// Whether the city data is published.
    #[serde(default)]
    pub is_live: bool,
    /// Counts reported for the city.
    #[serde(default)]
    pub statistics: CityStatistics,
    /// Processing status reported by the API.
    #[serde(default)]
    pub status: String,
    /// Layers available for the city.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl City {
    /// Finds a layer of the city by its slug.
    pub fn layer(&self, slug: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.slug == slug)
    }
}

/// Counts reported for a city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityStatistics {
    /// Number of layers in the city.
    pub total_layers: u64,
    /// Number of layers that finished processing.
    pub processed_layers: u64,
    /// Number of layers for which tiles are available.
    pub layers_with_tiles: u64,
    /// Number of features in all layers of the city.
    pub total_features: u64,
}

/// A raster layer of a city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Display name.
    pub name: String,
    /// URL-safe identifier, unique within the city.
    pub slug: String,
    /// Processing status reported by the API.
    #[serde(default)]
    pub status: String,
    /// Whether the layer is published.
    #[serde(default)]
    pub is_live: bool,
    /// Whether tiles were rendered for the layer.
    #[serde(default)]
    pub tiles_generated: bool,
    /// Number of features in the layer.
    #[serde(default)]
    pub feature_count: u64,
    /// Layer category, e.g. `roads`.
    #[serde(default)]
    pub category: String,
    /// Layer extent as sent by the API. Not interpreted.
    #[serde(default)]
    pub bounds: Value,
    /// Tile URLs as sent by the API. Not interpreted.
    #[serde(default)]
    pub tile_urls: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "status": "success",
        "total_states": 2,
        "hierarchy": [
            {
                "state": {
                    "name": "Telangana",
                    "slug": "telangana",
                    "code": "TS",
                    "center_lat": 17.9,
                    "center_lng": 79.1,
                    "is_active": true
                },
                "statistics": { "total_cities": 1, "total_layers": 2, "total_features": 1500 },
                "cities": [
                    {
                        "name": "Hyderabad",
                        "slug": "hyderabad",
                        "center_lat": 17.385,
                        "center_lng": 78.4867,
                        "is_active": true,
                        "is_live": true,
                        "statistics": {
                            "total_layers": 2,
                            "processed_layers": 2,
                            "layers_with_tiles": 2,
                            "total_features": 1500
                        },
                        "status": "ready",
                        "layers": [
                            {
                                "name": "Roads",
                                "slug": "roads",
                                "status": "ready",
                                "is_live": true,
                                "tiles_generated": true,
                                "feature_count": 1000,
                                "category": "transport",
                                "bounds": [78.2, 17.2, 78.7, 17.6],
                                "tile_urls": null
                            },
                            {
                                "name": "Water",
                                "slug": "water",
                                "status": "ready",
                                "is_live": true,
                                "tiles_generated": true,
                                "feature_count": 500,
                                "category": "hydrology",
                                "bounds": null,
                                "tile_urls": { "png": "/api/tiles/telangana/hyderabad/water" }
                            }
                        ]
                    }
                ]
            },
            {
                "state": {
                    "name": "Andhra Pradesh",
                    "slug": "andhra-pradesh",
                    "code": "AP",
                    "center_lat": null,
                    "center_lng": null,
                    "is_active": false
                },
                "statistics": { "total_cities": 0, "total_layers": 0, "total_features": 0 },
                "cities": []
            }
        ]
    }"#;

    #[test]
    fn parses_hierarchy_document() {
        let response: HierarchyResponse = serde_json::from_str(DOCUMENT).expect("invalid json");

        assert!(response.is_success());
        assert_eq!(response.total_states, 2);
        assert_eq!(response.hierarchy.len(), 2);

        let telangana = &response.hierarchy[0];
        assert_eq!(telangana.state.code, "TS");
        assert_eq!(telangana.state.center_lat, Some(17.9));

        let hyderabad = &telangana.cities[0];
        assert_eq!(hyderabad.slug, "hyderabad");
        assert_eq!(hyderabad.statistics.layers_with_tiles, 2);
        assert_eq!(hyderabad.layers.len(), 2);
        assert_eq!(
            hyderabad.layer("water").map(|l| l.category.as_str()),
            Some("hydrology")
        );
        assert!(hyderabad.layer("parks").is_none());

        let andhra = &response.hierarchy[1];
        assert_eq!(andhra.state.center_lat, None);
        assert!(!andhra.state.is_active);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let response: HierarchyResponse = serde_json::from_str(
            r#"{"status": "success", "hierarchy": [{"state": {"name": "X", "slug": "x"}}]}"#,
        )
        .expect("invalid json");

        let state_data = &response.hierarchy[0];
        assert_eq!(response.total_states, 0);
        assert_eq!(state_data.state.code, "");
        assert!(state_data.cities.is_empty());
        assert_eq!(state_data.statistics, StateStatistics::default());
    }

    #[test]
    fn reports_failed_status() {
        let response: HierarchyResponse =
            serde_json::from_str(r#"{"status": "error", "total_states": 0, "hierarchy": []}"#)
                .expect("invalid json");
        assert!(!response.is_success());
    }

    #[test]
    fn total_statistics_sums_states() {
        let response: HierarchyResponse = serde_json::from_str(DOCUMENT).expect("invalid json");

        assert_eq!(
            response.total_statistics(),
            TotalStatistics {
                total_states: 2,
                total_cities: 1,
                total_layers: 2,
                total_features: 1500,
            }
        );
    }

    #[test]
    fn total_statistics_of_empty_response() {
        assert_eq!(
            HierarchyResponse::default().total_statistics(),
            TotalStatistics::default()
        );
    }
}
