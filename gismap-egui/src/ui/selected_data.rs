use egui::{Align2, CollapsingHeader, RichText};
use gismap_types::SelectedLayerData;

/// Details of the current selection, in the bottom left corner of the map. Shown once a state
/// is selected.
pub fn selected_data_panel(ctx: &egui::Context, selected: &SelectedLayerData) {
    let Some(state_slug) = &selected.state_slug else {
        return;
    };

    egui::Window::new("selected_data")
        .title_bar(false)
        .resizable(false)
        .anchor(Align2::LEFT_BOTTOM, [10.0, -30.0])
        .show(ctx, |ui| {
            ui.label(RichText::new("Selected data").strong());

            egui::Grid::new("selected_data_grid")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("State:");
                    ui.label(format!(
                        "{} ({state_slug})",
                        selected.state_name.as_deref().unwrap_or(state_slug)
                    ));
                    ui.end_row();

                    if let Some(city_slug) = &selected.city_slug {
                        ui.label("City:");
                        ui.label(format!(
                            "{} ({city_slug})",
                            selected.city_name.as_deref().unwrap_or(city_slug)
                        ));
                        ui.end_row();
                    }

                    if !selected.layers_slugs.is_empty() {
                        ui.label("Layers:");
                        ui.label(selected.layers_slugs.join(", "));
                        ui.end_row();
                    }
                });

            CollapsingHeader::new("Raw JSON")
                .id_salt("selected_data_json")
                .show(ui, |ui| {
                    if let Ok(json) = serde_json::to_string_pretty(selected) {
                        ui.label(RichText::new(json).monospace().small());
                    }
                });
        });
}
