use galileo_egui::{EguiMap, EguiMapState};
use gismap::SelectionAction;

use crate::session::{Session, Startup};
use crate::ui::{self, LayerStatus, UiAction};

/// The viewer application: a map with the selected layers and the selection UI over it.
pub struct ViewerApp {
    map: EguiMapState,
    startup: Option<Startup>,
    session: Option<Session>,
    is_overview_open: bool,
}

impl ViewerApp {
    /// Creates the app. The session is started on the first frame.
    pub fn new(map: EguiMapState, startup: Startup) -> Self {
        Self {
            map,
            startup: Some(startup),
            session: None,
            is_overview_open: false,
        }
    }

    fn sync_layers(&mut self, rebuild: bool) {
        let Some(session) = &mut self.session else {
            return;
        };

        if session.sync_layers(self.map.map_mut(), rebuild) {
            self.map.request_redraw();
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::RefreshLayers => self.sync_layers(true),
            UiAction::SetOverviewOpen(is_open) => self.is_overview_open = is_open,
            UiAction::Select(action) => {
                if let Some(session) = &mut self.session {
                    session.store_mut().dispatch(action);
                }
            }
            UiAction::ClearAll => {
                if let Some(session) = &mut self.session {
                    session.store_mut().clear_all();
                }
            }
            UiAction::RetryHierarchy => {
                if let Some(session) = &self.session {
                    session.loader().retry();
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(startup) = self.startup.take() {
            self.session = Some(startup.start(ctx));
        }

        self.sync_layers(false);

        let Some(session) = &self.session else {
            return;
        };

        if session.take_redraw_request() {
            self.map.request_redraw();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            EguiMap::new(&mut self.map).show_ui(ui);
        });

        let store = session.store();
        let load_state = session.loader().state();
        let mut actions: Vec<UiAction> = escape_action(ctx, store.is_modal_open())
            .into_iter()
            .collect();

        actions.extend(ui::selection_button(ctx, store, self.is_overview_open));
        actions.extend(ui::status_indicator(
            ctx,
            store,
            LayerStatus {
                loaded_layers: session.custom_layers().len(),
                last_report: session.last_report(),
            },
        ));
        ui::selected_data_panel(ctx, store.selected());
        if self.is_overview_open {
            actions.extend(ui::hierarchy_overview(ctx, &load_state));
        }
        actions.extend(ui::selection_window(ctx, store, &load_state));

        if !actions.is_empty() {
            ctx.request_repaint();
        }
        for action in actions {
            self.apply(action);
        }
    }
}

/// Closes the selection window when Escape is pressed.
fn escape_action(ctx: &egui::Context, is_modal_open: bool) -> Option<UiAction> {
    let escape_pressed = ctx.input(|input| input.key_pressed(egui::Key::Escape));
    (is_modal_open && escape_pressed).then(|| SelectionAction::SetModalOpen(false).into())
}
