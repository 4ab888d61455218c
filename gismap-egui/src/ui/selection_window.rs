use egui::{RichText, ScrollArea};
use gismap::hierarchy::{Hierarchy, LoadState};
use gismap::selection::{CityChoice, StateChoice};
use gismap::{SelectionAction, SelectionStore};
use gismap_types::{City, SelectedLayerData, StateData};

use super::{format_count, plural, UiAction};

/// Window for choosing a state, a city and its layers. Shown while the store's window flag is
/// set.
///
/// Every choice is applied immediately, "Apply Selection" and "Cancel" only close the window.
pub fn selection_window(
    ctx: &egui::Context,
    store: &SelectionStore,
    load_state: &LoadState,
) -> Vec<UiAction> {
    let mut actions = vec![];
    if !store.is_modal_open() {
        return actions;
    }

    let mut is_open = true;
    egui::Window::new("Select GIS Layers")
        .open(&mut is_open)
        .collapsible(false)
        .default_width(420.0)
        .show(ctx, |ui| {
            match load_state {
                LoadState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading hierarchy...");
                    });
                }
                LoadState::Failed(message) => {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("Failed to load hierarchy: {message}"),
                    );
                    if ui.button("Retry").clicked() {
                        actions.push(UiAction::RetryHierarchy);
                    }
                }
                LoadState::Loaded(hierarchy) => {
                    ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                        selection_content(ui, hierarchy, store.selected(), &mut actions);
                    });
                }
            }

            ui.separator();
            footer(ui, store, &mut actions);
        });

    if !is_open {
        actions.push(SelectionAction::SetModalOpen(false).into());
    }

    actions
}

fn selection_content(
    ui: &mut egui::Ui,
    hierarchy: &Hierarchy,
    selected: &SelectedLayerData,
    actions: &mut Vec<UiAction>,
) {
    state_selector(ui, hierarchy, selected, actions);

    ui.label(
        RichText::new(format!(
            "Current selection: state {}, city {}, {}",
            selected.state_slug.as_deref().unwrap_or("none"),
            selected.city_slug.as_deref().unwrap_or("none"),
            plural(selected.selected_layers_count(), "layer", "layers"),
        ))
        .small()
        .weak(),
    );

    let Some(state_slug) = &selected.state_slug else {
        return;
    };

    ui.separator();
    let Some(state_data) = hierarchy.find_state(state_slug) else {
        ui.colored_label(
            ui.visuals().warn_fg_color,
            format!("Selected state \"{state_slug}\" is not available in the hierarchy"),
        );
        return;
    };

    ui.label(format!(
        "{}: {}",
        state_data.state.name,
        plural(state_data.cities.len(), "city", "cities")
    ));

    city_selector(ui, state_data, selected, actions);

    if let Some(city_slug) = &selected.city_slug {
        if let Some(city) = state_data.cities.iter().find(|city| &city.slug == city_slug) {
            ui.separator();
            layer_selector(ui, city, selected, actions);
        }
    }

    if selected.has_any_selections() {
        ui.separator();
        ui.label(RichText::new("Selection summary").strong());
        ui.label(format!(
            "{} / {}",
            selected.state_name.as_deref().unwrap_or(state_slug),
            selected.city_name.as_deref().unwrap_or_default(),
        ));
        ui.label(format!("Layers: {}", selected.layers_slugs.join(", ")));
    }
}

fn state_selector(
    ui: &mut egui::Ui,
    hierarchy: &Hierarchy,
    selected: &SelectedLayerData,
    actions: &mut Vec<UiAction>,
) {
    ui.label(RichText::new("State").strong());
    ui.horizontal(|ui| {
        let selected_text = selected
            .state_name
            .clone()
            .unwrap_or_else(|| "Choose a state...".to_string());

        egui::ComboBox::from_id_salt("state_selector")
            .selected_text(selected_text)
            .width(260.0)
            .show_ui(ui, |ui| {
                for item in hierarchy.states() {
                    let is_selected =
                        selected.state_slug.as_deref() == Some(item.state.slug.as_str());
                    let label = format!("{} ({})", item.state.name, item.state.code);
                    if ui.selectable_label(is_selected, label).clicked() && !is_selected {
                        actions.push(
                            SelectionAction::SetState(Some(StateChoice::from(&item.state))).into(),
                        );
                    }
                }
            });

        if selected.state_slug.is_some() && ui.button("Clear State").clicked() {
            actions.push(SelectionAction::SetState(None).into());
        }
    });
}

fn city_selector(
    ui: &mut egui::Ui,
    state_data: &StateData,
    selected: &SelectedLayerData,
    actions: &mut Vec<UiAction>,
) {
    ui.label(RichText::new("City").strong());

    if state_data.cities.is_empty() {
        ui.label("No cities available");
        return;
    }

    for city in &state_data.cities {
        let is_selected = selected.city_slug.as_deref() == Some(city.slug.as_str());
        let label = format!(
            "{} ({}, {} features)",
            city.name,
            plural(city.layers.len(), "layer", "layers"),
            format_count(city.statistics.total_features),
        );

        if ui.radio(is_selected, label).clicked() && !is_selected {
            actions.push(SelectionAction::SetCity(Some(CityChoice::from(city))).into());
        }
    }
}

fn layer_selector(
    ui: &mut egui::Ui,
    city: &City,
    selected: &SelectedLayerData,
    actions: &mut Vec<UiAction>,
) {
    ui.label(RichText::new(format!("Layers of {}", city.name)).strong());

    if city.layers.is_empty() {
        ui.label("No layers available");
        return;
    }

    for layer in &city.layers {
        let mut is_selected = selected.is_layer_selected(&layer.slug);
        let label = if layer.category.is_empty() {
            format!("{} ({} features)", layer.name, format_count(layer.feature_count))
        } else {
            format!(
                "{} ({} features, {})",
                layer.name,
                format_count(layer.feature_count),
                layer.category
            )
        };

        if ui.checkbox(&mut is_selected, label).changed() {
            actions.push(SelectionAction::ToggleLayer(layer.slug.clone()).into());
        }
    }
}

fn footer(ui: &mut egui::Ui, store: &SelectionStore, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        if ui.button("Clear All").clicked() {
            actions.push(UiAction::ClearAll);
        }

        ui.label(format!(
            "{}, {} selected",
            plural(store.selected_cities_count(), "city", "cities"),
            plural(store.selected_layers_count(), "layer", "layers"),
        ));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Apply Selection").clicked() {
                actions.push(SelectionAction::SetModalOpen(false).into());
            }
            if ui.button("Cancel").clicked() {
                actions.push(SelectionAction::SetModalOpen(false).into());
            }
        });
    });
}
