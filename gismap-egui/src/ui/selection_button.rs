use egui::{Align2, RichText};
use gismap::{SelectionAction, SelectionStore};

use super::{plural, UiAction};

/// Button opening the selection window, in the top right corner of the map.
pub fn selection_button(
    ctx: &egui::Context,
    store: &SelectionStore,
    is_overview_open: bool,
) -> Vec<UiAction> {
    let mut actions = vec![];

    egui::Window::new("selection_button")
        .title_bar(false)
        .resizable(false)
        .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(RichText::new("Select Layers").strong()).clicked() {
                    actions.push(SelectionAction::SetModalOpen(true).into());
                }

                if store.has_any_selections() {
                    ui.label(
                        RichText::new(plural(store.selected_cities_count(), "city", "cities"))
                            .small()
                            .color(ui.visuals().hyperlink_color),
                    );
                    ui.label(
                        RichText::new(plural(store.selected_layers_count(), "layer", "layers"))
                            .small()
                            .color(ui.visuals().hyperlink_color),
                    );
                }

                let mut show_overview = is_overview_open;
                if ui.toggle_value(&mut show_overview, "Hierarchy").changed() {
                    actions.push(UiAction::SetOverviewOpen(show_overview));
                }
            });
        });

    actions
}
