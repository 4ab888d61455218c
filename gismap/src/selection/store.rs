use gismap_types::SelectedLayerData;
use log::{debug, info, warn};

use super::{SelectionAction, SelectionState, SelectionStorage};

/// Selection state with persistence.
///
/// Every change of the selection is written to the storage. The selection window flag is not
/// persisted.
pub struct SelectionStore<S: SelectionStorage = Box<dyn SelectionStorage>> {
    state: SelectionState,
    storage: S,
    revision: u64,
}

impl<S: SelectionStorage> SelectionStore<S> {
    /// Creates a store with the selection read from `storage`.
    ///
    /// If nothing is stored, or the stored document cannot be used, the store starts with an
    /// empty selection.
    pub fn load(storage: S) -> Self {
        let mut state = SelectionState::default();

        match storage.read() {
            Ok(Some(raw)) => match serde_json::from_str::<SelectedLayerData>(&raw) {
                Ok(data) if data.is_consistent() => {
                    info!(
                        "Restored layer selection: state {:?}, city {:?}, {} layers",
                        data.state_slug,
                        data.city_slug,
                        data.layers_slugs.len()
                    );
                    state = state.reduce(SelectionAction::LoadFromStorage(data));
                }
                Ok(data) => warn!("Discarding inconsistent saved selection: {data:?}"),
                Err(err) => warn!("Error loading saved selections: {err}"),
            },
            Ok(None) => debug!("No saved layer selection"),
            Err(err) => warn!("Failed to read saved selections: {err}"),
        }

        Self {
            state,
            storage,
            revision: 0,
        }
    }

    /// Applies the action. If the selection changed, it is persisted.
    ///
    /// Returns true if the selection changed.
    pub fn dispatch(&mut self, action: SelectionAction) -> bool {
        debug!("Selection action: {action:?}");

        let previous = self.state.selected.clone();
        self.state = std::mem::take(&mut self.state).reduce(action);

        let changed = self.state.selected != previous;
        if changed {
            self.revision += 1;
            self.persist();
        }

        changed
    }

    /// Clears the selection and removes the stored document.
    pub fn clear_all(&mut self) {
        self.dispatch(SelectionAction::ClearAll);
        if let Err(err) = self.storage.remove() {
            warn!("Failed to remove saved selections: {err}");
        }
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.state.selected) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!("Failed to serialize layer selection: {err}");
                return;
            }
        };

        if let Err(err) = self.storage.write(&serialized) {
            warn!("Failed to save layer selection: {err}");
        }
    }

    /// Full state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Current selection.
    pub fn selected(&self) -> &SelectedLayerData {
        &self.state.selected
    }

    /// Whether the selection window is open.
    pub fn is_modal_open(&self) -> bool {
        self.state.is_modal_open
    }

    /// Number of selected layers.
    pub fn selected_layers_count(&self) -> usize {
        self.state.selected.selected_layers_count()
    }

    /// Number of selected cities.
    pub fn selected_cities_count(&self) -> usize {
        self.state.selected.selected_cities_count()
    }

    /// Whether a state, a city and at least one layer are selected.
    pub fn has_any_selections(&self) -> bool {
        self.state.selected.has_any_selections()
    }

    /// Counter incremented on every change of the selection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::error::GismapError;
    use crate::selection::{CityChoice, MemoryStorage, StateChoice};

    fn select_hyderabad_roads(store: &mut SelectionStore<MemoryStorage>) {
        store.dispatch(SelectionAction::SetState(Some(StateChoice {
            slug: "telangana".into(),
            name: "Telangana".into(),
        })));
        store.dispatch(SelectionAction::SetCity(Some(CityChoice {
            slug: "hyderabad".into(),
            name: "Hyderabad".into(),
        })));
        store.dispatch(SelectionAction::ToggleLayer("roads".into()));
    }

    #[test]
    fn starts_empty_without_stored_data() {
        let store = SelectionStore::load(MemoryStorage::new());

        assert!(store.selected().is_empty());
        assert!(!store.is_modal_open());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn persists_every_change() {
        let mut store = SelectionStore::load(MemoryStorage::new());
        select_hyderabad_roads(&mut store);

        assert_eq!(store.revision(), 3);
        assert_eq!(store.selected_layers_count(), 1);
        assert_eq!(store.selected_cities_count(), 1);
        assert!(store.has_any_selections());
        assert_snapshot!(
            store.storage().value().expect("nothing stored"),
            @r#"{"state_slug":"telangana","city_slug":"hyderabad","layers_slugs":["roads"],"state_name":"Telangana","city_name":"Hyderabad"}"#
        );
    }

    #[test]
    fn restores_stored_selection() {
        let mut store = SelectionStore::load(MemoryStorage::new());
        select_hyderabad_roads(&mut store);
        let saved = store.storage().clone();

        let restored = SelectionStore::load(saved);
        assert_eq!(restored.selected(), store.selected());
        assert_eq!(restored.revision(), 0);
    }

    #[test]
    fn malformed_stored_data_is_ignored() {
        for raw in ["not json", r#"{"layers_slugs": "roads"}"#, r#"{"layers_slugs": ["roads"]}"#] {
            let store = SelectionStore::load(MemoryStorage::with_value(raw));
            assert!(store.selected().is_empty(), "loaded from {raw}");
        }
    }

    #[test]
    fn modal_flag_is_not_persisted() {
        let mut store = SelectionStore::load(MemoryStorage::new());

        assert!(!store.dispatch(SelectionAction::SetModalOpen(true)));
        assert!(store.is_modal_open());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.storage().value(), None);
    }

    #[test]
    fn unchanged_selection_is_not_persisted_again() {
        let mut store = SelectionStore::load(MemoryStorage::new());
        assert!(!store.dispatch(SelectionAction::ClearAll));
        assert_eq!(store.storage().value(), None);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn clear_all_removes_stored_data() {
        let mut store = SelectionStore::load(MemoryStorage::new());
        select_hyderabad_roads(&mut store);

        store.clear_all();

        assert!(store.selected().is_empty());
        assert_eq!(store.storage().value(), None);
        assert_eq!(store.revision(), 4);
    }

    struct FailingStorage;

    impl SelectionStorage for FailingStorage {
        fn read(&self) -> Result<Option<String>, GismapError> {
            Err(GismapError::Storage("unavailable".into()))
        }

        fn write(&mut self, _value: &str) -> Result<(), GismapError> {
            Err(GismapError::Storage("unavailable".into()))
        }

        fn remove(&mut self) -> Result<(), GismapError> {
            Err(GismapError::Storage("unavailable".into()))
        }
    }

    #[test]
    fn storage_failures_do_not_interrupt() {
        let mut store = SelectionStore::load(FailingStorage);
        assert!(store.dispatch(SelectionAction::SetState(Some(StateChoice {
            slug: "telangana".into(),
            name: "Telangana".into(),
        }))));
        store.clear_all();
        assert!(store.selected().is_empty());
    }
}
