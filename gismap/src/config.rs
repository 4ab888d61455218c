//! Viewer configuration.
//!
//! All values have defaults and can be overridden with environment variables. In the browser
//! there is no process environment, so the variables are read at build time instead.

use std::path::PathBuf;

use crate::error::GismapError;

/// Base URL of the GIS API.
pub const API_URL_VAR: &str = "GISMAP_API_URL";
/// Access token of the Mapbox base map.
pub const MAPBOX_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";
/// Base map provider: `osm` or `mapbox`.
pub const BASE_MAP_VAR: &str = "GISMAP_BASE_MAP";
/// Mapbox style id, e.g. `mapbox/satellite-streets-v12`.
pub const MAPBOX_STYLE_VAR: &str = "GISMAP_MAPBOX_STYLE";
/// Initial map center as `lat,lng`.
pub const CENTER_VAR: &str = "GISMAP_CENTER";
/// Initial zoom level.
pub const ZOOM_VAR: &str = "GISMAP_ZOOM";
/// Folder for the persisted layer selection.
pub const STORAGE_DIR_VAR: &str = "GISMAP_STORAGE_DIR";
/// Folder for cached base map tiles.
pub const TILE_CACHE_VAR: &str = "GISMAP_TILE_CACHE";

const DEFAULT_API_URL: &str = "https://gis-map.1acre.in";
const DEFAULT_MAPBOX_STYLE: &str = "mapbox/satellite-streets-v12";
// Hyderabad
const DEFAULT_CENTER: (f64, f64) = (17.3850, 78.4867);
const DEFAULT_ZOOM: u32 = 10;
const MAX_ZOOM: u32 = 22;
const DEFAULT_STORAGE_DIR: &str = ".gismap";
const DEFAULT_TILE_CACHE: &str = ".tile_cache";

/// Kind of the base map requested by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseMapKind {
    /// Open Street Map tiles.
    Osm,
    /// Mapbox raster tiles of the configured style.
    Mapbox,
}

/// Base map with everything needed to request its tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseMap {
    /// Open Street Map tiles.
    Osm,
    /// Mapbox static tiles.
    Mapbox {
        /// Mapbox access token.
        access_token: String,
        /// Style id, e.g. `mapbox/satellite-streets-v12`.
        style: String,
    },
}

impl BaseMap {
    /// URL of the base map tile with the given index.
    pub fn tile_url(&self, z: u32, x: i32, y: i32) -> String {
        match self {
            BaseMap::Osm => format!("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            BaseMap::Mapbox {
                access_token,
                style,
            } => format!(
                "https://api.mapbox.com/styles/v1/{style}/tiles/256/{z}/{x}/{y}?access_token={access_token}"
            ),
        }
    }

    /// Attribution text and URL required by the tile provider.
    pub fn attribution(&self) -> (&'static str, &'static str) {
        match self {
            BaseMap::Osm => (
                "© OpenStreetMap contributors",
                "https://www.openstreetmap.org/copyright",
            ),
            BaseMap::Mapbox { .. } => (
                "© Mapbox © OpenStreetMap",
                "https://www.mapbox.com/about/maps/",
            ),
        }
    }
}

/// Configuration of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Base URL of the GIS API, without a trailing slash.
    pub api_base_url: String,
    /// Mapbox access token, if any.
    pub mapbox_access_token: Option<String>,
    /// Requested base map provider.
    pub base_map: BaseMapKind,
    /// Mapbox style id.
    pub mapbox_style: String,
    /// Latitude of the initial map center.
    pub center_lat: f64,
    /// Longitude of the initial map center.
    pub center_lng: f64,
    /// Initial zoom level.
    pub zoom: u32,
    /// Folder where the layer selection is stored on native platforms.
    pub storage_dir: PathBuf,
    /// Folder where base map tiles are cached on native platforms.
    pub tile_cache_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            mapbox_access_token: None,
            base_map: BaseMapKind::Osm,
            mapbox_style: DEFAULT_MAPBOX_STYLE.to_string(),
            center_lat: DEFAULT_CENTER.0,
            center_lng: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            tile_cache_dir: PathBuf::from(DEFAULT_TILE_CACHE),
        }
    }
}

impl ViewerConfig {
    /// Reads the configuration from the environment.
    ///
    /// Natively the process environment is used. In the browser the values are taken from the
    /// environment at build time.
    pub fn from_env() -> Result<Self, GismapError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        #[cfg(target_arch = "wasm32")]
        {
            Self::from_lookup(build_time_var)
        }
    }

    /// Builds the configuration using `lookup` to get the values of the variables. Empty values
    /// are treated as not set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GismapError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(url) = get(API_URL_VAR) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        config.mapbox_access_token = get(MAPBOX_TOKEN_VAR);
        config.base_map = match get(BASE_MAP_VAR) {
            Some(value) => parse_base_map_kind(&value)?,
            None if config.mapbox_access_token.is_some() => BaseMapKind::Mapbox,
            None => BaseMapKind::Osm,
        };

        if let Some(style) = get(MAPBOX_STYLE_VAR) {
            config.mapbox_style = style;
        }

        if let Some(center) = get(CENTER_VAR) {
            let (lat, lng) = parse_center(&center)?;
            config.center_lat = lat;
            config.center_lng = lng;
        }

        if let Some(zoom) = get(ZOOM_VAR) {
            config.zoom = parse_zoom(&zoom)?;
        }

        if let Some(dir) = get(STORAGE_DIR_VAR) {
            config.storage_dir = PathBuf::from(dir);
        }

        if let Some(dir) = get(TILE_CACHE_VAR) {
            config.tile_cache_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// URL of the hierarchy document.
    pub fn hierarchy_url(&self) -> String {
        format!("{}/api/hierarchy/", self.api_base_url)
    }

    /// Base URL of the layer tiles.
    pub fn tiles_base_url(&self) -> String {
        format!("{}/api/tiles", self.api_base_url)
    }

    /// Resolves the base map.
    ///
    /// Returns an error if Mapbox is requested without an access token.
    pub fn base_map(&self) -> Result<BaseMap, GismapError> {
        match self.base_map {
            BaseMapKind::Osm => Ok(BaseMap::Osm),
            BaseMapKind::Mapbox => match &self.mapbox_access_token {
                Some(token) => Ok(BaseMap::Mapbox {
                    access_token: token.clone(),
                    style: self.mapbox_style.clone(),
                }),
                None => Err(GismapError::Config(format!(
                    "mapbox base map requires {MAPBOX_TOKEN_VAR} to be set"
                ))),
            },
        }
    }

    /// Resolves the base map, falling back to Open Street Map if the requested one cannot be
    /// used.
    pub fn base_map_or_osm(&self) -> BaseMap {
        self.base_map().unwrap_or_else(|err| {
            log::warn!("{err}, using OpenStreetMap base map");
            BaseMap::Osm
        })
    }
}

fn parse_base_map_kind(value: &str) -> Result<BaseMapKind, GismapError> {
    match value.to_ascii_lowercase().as_str() {
        "osm" | "leaflet" => Ok(BaseMapKind::Osm),
        "mapbox" => Ok(BaseMapKind::Mapbox),
        other => Err(GismapError::Config(format!(
            "unknown base map '{other}', expected 'osm' or 'mapbox'"
        ))),
    }
}

fn parse_center(value: &str) -> Result<(f64, f64), GismapError> {
    let invalid = || GismapError::Config(format!("invalid map center '{value}', expected 'lat,lng'"));

    let (lat, lng) = value.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid());
    }

    Ok((lat, lng))
}

fn parse_zoom(value: &str) -> Result<u32, GismapError> {
    match value.parse::<u32>() {
        Ok(zoom) if zoom <= MAX_ZOOM => Ok(zoom),
        _ => Err(GismapError::Config(format!(
            "invalid zoom level '{value}', expected 0..={MAX_ZOOM}"
        ))),
    }
}

#[cfg(target_arch = "wasm32")]
fn build_time_var(key: &str) -> Option<String> {
    let value = match key {
        API_URL_VAR => option_env!("GISMAP_API_URL"),
        MAPBOX_TOKEN_VAR => option_env!("MAPBOX_ACCESS_TOKEN"),
        BASE_MAP_VAR => option_env!("GISMAP_BASE_MAP"),
        MAPBOX_STYLE_VAR => option_env!("GISMAP_MAPBOX_STYLE"),
        CENTER_VAR => option_env!("GISMAP_CENTER"),
        ZOOM_VAR => option_env!("GISMAP_ZOOM"),
        _ => None,
    };

    value.map(str::to_string)
}
