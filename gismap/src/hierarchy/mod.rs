//! Access to the state -> city -> layer hierarchy.
//!
//! The hierarchy is loaded once from the GIS API with [`HierarchyClient`] (or in the background
//! with [`HierarchyLoader`]) and is read-only afterwards. [`Hierarchy`] wraps the loaded document
//! and provides the lookups the viewer needs.

use gismap_types::{City, HierarchyResponse, State, StateData, TotalStatistics};

mod client;
mod loader;

pub use client::{parse_hierarchy, HierarchyClient};
pub use loader::{HierarchyLoader, LoadState, UpdateNotifier};

/// Loaded hierarchy document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    response: HierarchyResponse,
}

impl Hierarchy {
    /// Wraps the response of the hierarchy endpoint.
    pub fn new(response: HierarchyResponse) -> Self {
        Self { response }
    }

    /// The response as it was received.
    pub fn response(&self) -> &HierarchyResponse {
        &self.response
    }

    /// All states in the order given by the API.
    pub fn states(&self) -> &[StateData] {
        &self.response.hierarchy
    }

    /// Returns true if the hierarchy has no states.
    pub fn is_empty(&self) -> bool {
        self.response.hierarchy.is_empty()
    }

    /// Finds a state by its slug, or, if no slug matches, by its code.
    ///
    /// Selections always store the slug, but documents saved by older versions of the viewer
    /// could contain the state code instead.
    pub fn find_state(&self, key: &str) -> Option<&StateData> {
        let states = self.states();
        states
            .iter()
            .find(|item| item.state.slug == key)
            .or_else(|| states.iter().find(|item| item.state.code == key))
    }

    /// Finds a state by its code.
    pub fn state_by_code(&self, code: &str) -> Option<&State> {
        self.states()
            .iter()
            .find(|item| item.state.code == code)
            .map(|item| &item.state)
    }

    /// Cities of the state with the given code. Empty if there is no such state.
    pub fn cities_by_state_code(&self, code: &str) -> &[City] {
        self.states()
            .iter()
            .find(|item| item.state.code == code)
            .map(|item| item.cities.as_slice())
            .unwrap_or_default()
    }

    /// Cities of the state found with [`Hierarchy::find_state`].
    pub fn cities_of(&self, state_key: &str) -> &[City] {
        self.find_state(state_key)
            .map(|item| item.cities.as_slice())
            .unwrap_or_default()
    }

    /// Finds a city of a state.
    pub fn find_city(&self, state_key: &str, city_slug: &str) -> Option<&City> {
        self.cities_of(state_key)
            .iter()
            .find(|city| city.slug == city_slug)
    }

    /// Cities of all states.
    pub fn all_cities(&self) -> impl Iterator<Item = &City> + '_ {
        self.states().iter().flat_map(|item| item.cities.iter())
    }

    /// Aggregated counts over all states.
    pub fn total_statistics(&self) -> TotalStatistics {
        self.response.total_statistics()
    }
}

impl From<HierarchyResponse> for Hierarchy {
    fn from(response: HierarchyResponse) -> Self {
        Self::new(response)
    }
}
