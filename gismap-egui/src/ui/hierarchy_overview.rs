use egui::{CollapsingHeader, RichText, ScrollArea};
use gismap::hierarchy::{Hierarchy, LoadState};
use gismap_types::StateData;

use super::{format_count, UiAction};

/// Window with the loaded hierarchy: totals, a breakdown by state and the raw document.
pub fn hierarchy_overview(ctx: &egui::Context, load_state: &LoadState) -> Vec<UiAction> {
    let mut actions = vec![];
    let mut is_open = true;

    egui::Window::new("GIS Hierarchy")
        .open(&mut is_open)
        .default_width(360.0)
        .default_pos([10.0, 200.0])
        .show(ctx, |ui| match load_state {
            LoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading GIS hierarchy data...");
                });
            }
            LoadState::Failed(message) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Error loading hierarchy: {message}"),
                );
                if ui.button("Retry").clicked() {
                    actions.push(UiAction::RetryHierarchy);
                }
            }
            LoadState::Loaded(hierarchy) if hierarchy.is_empty() => {
                ui.label("No hierarchy data available");
            }
            LoadState::Loaded(hierarchy) => {
                ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                    overview(ui, hierarchy);
                });
            }
        });

    if !is_open {
        actions.push(UiAction::SetOverviewOpen(false));
    }

    actions
}

fn overview(ui: &mut egui::Ui, hierarchy: &Hierarchy) {
    let totals = hierarchy.total_statistics();

    egui::Grid::new("hierarchy_totals")
        .num_columns(2)
        .show(ui, |ui| {
            for (label, value) in [
                ("States", totals.total_states),
                ("Cities", totals.total_cities),
                ("Layers", totals.total_layers),
                ("Features", totals.total_features),
            ] {
                ui.label(label);
                ui.label(RichText::new(format_count(value)).strong());
                ui.end_row();
            }
        });

    let status = &hierarchy.response().status;
    if hierarchy.response().is_success() {
        ui.label(format!("API status: {status}"));
    } else {
        ui.colored_label(ui.visuals().warn_fg_color, format!("API status: {status}"));
    }

    ui.separator();
    for state_data in hierarchy.states() {
        state_breakdown(ui, state_data);
    }

    ui.separator();
    CollapsingHeader::new("Raw JSON").show(ui, |ui| {
        match serde_json::to_string_pretty(hierarchy.response()) {
            Ok(json) => {
                ui.label(RichText::new(json).monospace().small());
            }
            Err(err) => {
                ui.label(format!("Failed to serialize hierarchy: {err}"));
            }
        }
    });
}

fn state_breakdown(ui: &mut egui::Ui, state_data: &StateData) {
    let state = &state_data.state;
    let statistics = &state_data.statistics;

    CollapsingHeader::new(format!("{} ({})", state.name, state.code))
        .id_salt(&state.slug)
        .show(ui, |ui| {
            ui.label(format!(
                "{} cities, {} layers, {} features",
                format_count(statistics.total_cities),
                format_count(statistics.total_layers),
                format_count(statistics.total_features),
            ));

            for city in &state_data.cities {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&city.name).strong());
                    ui.label(
                        RichText::new(format!(
                            "({:.4}, {:.4})",
                            city.center_lat, city.center_lng
                        ))
                        .small()
                        .weak(),
                    );
                    ui.label(format!(
                        "{} features",
                        format_count(city.statistics.total_features)
                    ));
                });
            }
        });
}
