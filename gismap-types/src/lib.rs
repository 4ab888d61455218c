//! Types shared by the gismap crates.
//!
//! The [`hierarchy`] module describes the document served by the hierarchy endpoint of the GIS
//! API: a list of states, each with its cities, each city with the raster layers that can be
//! shown on top of the base map. The [`selection`] module contains [`SelectedLayerData`], the
//! user's current choice of a state, a city and a set of layers, in the form it is persisted.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod hierarchy;
pub mod selection;

pub use hierarchy::{
    City, CityStatistics, HierarchyResponse, Layer, State, StateData, StateStatistics,
    TotalStatistics,
};
pub use selection::SelectedLayerData;
