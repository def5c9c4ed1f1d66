use eframe::egui::{self, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dataset selection and visualization toggles
// ---------------------------------------------------------------------------

/// Render the left options panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Dataset");
    ui.separator();

    let datasets = state
        .page
        .as_ref()
        .map(|p| p.datasets.clone())
        .unwrap_or_default();

    if datasets.is_empty() {
        ui.label("No datasets available.");
    } else {
        ui.label("Choose a dataset");
        let current = state.request.selected_file.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("dataset_select")
            .selected_text(&current)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for name in &datasets {
                    if ui.selectable_label(current == *name, name).clicked() {
                        state.select_dataset(name.clone());
                    }
                }
            });
    }

    ui.add_space(12.0);
    ui.heading("Visualization Options");
    ui.separator();

    let toggles = &mut state.request.toggles;
    let mut changed = false;
    changed |= ui
        .checkbox(&mut toggles.close_price, "Show Closing Price Over Time")
        .changed();
    changed |= ui
        .checkbox(&mut toggles.volume, "Show Volume Over Time")
        .changed();
    changed |= ui
        .checkbox(&mut toggles.correlation, "Show Correlation Heatmap")
        .changed();
    changed |= ui
        .checkbox(&mut toggles.custom_analysis, "Enable Custom Column Analysis")
        .changed();
    if changed {
        state.mark_changed();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Choose data folder…").clicked() {
                choose_data_dir(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("Data folder: {}", state.request.data_dir.display()));

        if let Some(page) = &state.page {
            ui.separator();
            ui.label(format!("{} dataset(s)", page.datasets.len()));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn choose_data_dir(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Choose the folder holding CSV datasets");
    if state.request.data_dir.is_dir() {
        dialog = dialog.set_directory(&state.request.data_dir);
    }

    if let Some(dir) = dialog.pick_folder() {
        state.set_data_dir(dir);
    }
}
