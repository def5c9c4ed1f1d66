use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{page, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.refresh();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset + visualization options ----
        egui::SidePanel::left("options_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            page::show(ui, &mut self.state);
        });

        // Controls changed this frame: draw the new page straight away.
        if self.state.is_dirty() {
            ctx.request_repaint();
        }
    }
}
