use egui::{Align2, Color32, RichText};
use gismap::reconcile::ReconcileReport;
use gismap::SelectionStore;

use super::UiAction;

/// Layers currently shown on the map and the result of the last reconciliation.
pub struct LayerStatus<'a> {
    /// Number of layers added to the map.
    pub loaded_layers: usize,
    /// Result of the last reconciliation.
    pub last_report: &'a ReconcileReport,
}

/// Summary of the selection and of the map layers, in the top left corner of the map. Hidden
/// when nothing is selected.
pub fn status_indicator(
    ctx: &egui::Context,
    store: &SelectionStore,
    status: LayerStatus<'_>,
) -> Vec<UiAction> {
    let mut actions = vec![];
    if !store.has_any_selections() {
        return actions;
    }

    egui::Window::new("layer_status")
        .title_bar(false)
        .resizable(false)
        .anchor(Align2::LEFT_TOP, [10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(RichText::new("Layer status").strong());

            egui::Grid::new("layer_status_grid")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Selected cities:");
                    ui.label(store.selected_cities_count().to_string());
                    ui.end_row();

                    ui.label("Selected layers:");
                    ui.label(store.selected_layers_count().to_string());
                    ui.end_row();

                    ui.label("Loaded layers:");
                    ui.label(status.loaded_layers.to_string());
                    ui.end_row();
                });

            let failures = &status.last_report.failures;
            if failures.is_empty() {
                ui.label(RichText::new("Layers applied").color(Color32::DARK_GREEN));
            } else {
                ui.label(
                    RichText::new(format!("{} layer errors", failures.len()))
                        .color(ui.visuals().error_fg_color),
                );
                for failure in failures {
                    ui.label(
                        RichText::new(format!("{}: {}", failure.layer_id, failure.message))
                            .small(),
                    );
                }
            }

            if ui.button("Refresh Layers").clicked() {
                actions.push(UiAction::RefreshLayers);
            }
        });

    actions
}
