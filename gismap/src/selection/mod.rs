//! Layer selection state machine.
//!
//! [`SelectionState`] is changed only through [`SelectionAction`]s applied by the pure
//! [`SelectionState::reduce`] function. The reducer keeps the selection consistent: choosing a
//! state clears the city and the layers, choosing a city clears the layers.
//!
//! [`SelectionStore`] wraps the state together with a [`SelectionStorage`] backend, so that
//! every change is persisted and the last selection is restored on start.

use gismap_types::{City, SelectedLayerData, State};

mod storage;
mod store;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{default_storage, MemoryStorage, SelectionStorage, STORAGE_KEY};
pub use store::SelectionStore;

/// State chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChoice {
    /// Slug of the state.
    pub slug: String,
    /// Display name of the state.
    pub name: String,
}

impl From<&State> for StateChoice {
    fn from(state: &State) -> Self {
        Self {
            slug: state.slug.clone(),
            name: state.name.clone(),
        }
    }
}

/// City chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityChoice {
    /// Slug of the city.
    pub slug: String,
    /// Display name of the city.
    pub name: String,
}

impl From<&City> for CityChoice {
    fn from(city: &City) -> Self {
        Self {
            slug: city.slug.clone(),
            name: city.name.clone(),
        }
    }
}

/// Change of the selection state.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    /// Selects a state, or clears it with `None`. Always clears the city and the layers.
    SetState(Option<StateChoice>),
    /// Selects a city, or clears it with `None`. Always clears the layers. Ignored if no state
    /// is selected.
    SetCity(Option<CityChoice>),
    /// Adds the layer slug to the selection if it is not there, removes it otherwise. Ignored if
    /// no city is selected.
    ToggleLayer(String),
    /// Clears the whole selection.
    ClearAll,
    /// Opens or closes the selection window.
    SetModalOpen(bool),
    /// Replaces the selection with previously stored data. Inconsistent data is ignored.
    LoadFromStorage(SelectedLayerData),
}

/// Selection together with the UI flag of the selection window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Current selection.
    pub selected: SelectedLayerData,
    /// Whether the selection window is shown.
    pub is_modal_open: bool,
}

impl SelectionState {
    /// Applies the action and returns the new state.
    pub fn reduce(mut self, action: SelectionAction) -> Self {
        let selected = &mut self.selected;
        match action {
            SelectionAction::SetState(choice) => {
                let (slug, name) = match choice {
                    Some(StateChoice { slug, name }) => (Some(slug), Some(name)),
                    None => (None, None),
                };
                selected.state_slug = slug;
                selected.state_name = name;
                selected.city_slug = None;
                selected.city_name = None;
                selected.layers_slugs.clear();
            }
            SelectionAction::SetCity(choice) => {
                if selected.state_slug.is_none() && choice.is_some() {
                    return self;
                }

                let (slug, name) = match choice {
                    Some(CityChoice { slug, name }) => (Some(slug), Some(name)),
                    None => (None, None),
                };
                selected.city_slug = slug;
                selected.city_name = name;
                selected.layers_slugs.clear();
            }
            SelectionAction::ToggleLayer(layer_slug) => {
                if selected.city_slug.is_none() {
                    return self;
                }

                if selected.is_layer_selected(&layer_slug) {
                    selected.layers_slugs.retain(|slug| *slug != layer_slug);
                } else {
                    selected.layers_slugs.push(layer_slug);
                }
            }
            SelectionAction::ClearAll => {
                *selected = SelectedLayerData::default();
            }
            SelectionAction::SetModalOpen(is_open) => {
                self.is_modal_open = is_open;
            }
            SelectionAction::LoadFromStorage(data) => {
                if data.is_consistent() {
                    *selected = data;
                }
            }
        }

        self
    }
}
