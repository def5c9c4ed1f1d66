use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::charts::{ChartId, ChartPanel};
use crate::error::Severity;
use crate::pipeline::RenderPass;
use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Central panel – the rendered page
// ---------------------------------------------------------------------------

/// Draw the page from the last render pass, top to bottom.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    // Taken out so the custom-chart selectors can edit the request meanwhile.
    let Some(page) = state.page.take() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(&page.title).size(26.0).strong());
            ui.add_space(6.0);
            banner(ui, page.banner.severity, &page.banner.message);

            if let Some(report) = &page.report {
                let file = page.selected_file.as_deref().unwrap_or_default();
                tables::report(ui, report, file);
            }

            for (idx, panel) in page.charts.iter().enumerate() {
                ui.add_space(16.0);
                chart_section(ui, state, &page, idx, panel);
            }
        });

    state.page = Some(page);
}

fn chart_section(
    ui: &mut Ui,
    state: &mut AppState,
    page: &RenderPass,
    idx: usize,
    panel: &ChartPanel,
) {
    ui.heading(&panel.heading);

    if panel.chart == ChartId::Custom {
        if let Some((x, y)) = &page.axes {
            ui.label("Create a line chart by selecting the x-axis and y-axis columns.");
            let columns = &page.columns;
            if let Some(col) = column_selector(ui, "x_axis", "Select X-axis column", columns, x) {
                state.set_custom_x(col);
            }
            if let Some(col) = column_selector(ui, "y_axis", "Select Y-axis column", columns, y) {
                state.set_custom_y(col);
            }
        }
    }

    if let Some(caption) = &panel.caption {
        ui.strong(caption);
    }

    match &panel.outcome {
        Ok(spec) => plot::chart(ui, idx, spec, state.config.charts.height),
        Err(failure) => banner(ui, failure.severity, &failure.message),
    }
}

/// A combo box over `columns`; returns the newly picked column, if any.
fn column_selector(
    ui: &mut Ui,
    id: &str,
    label: &str,
    columns: &[String],
    current: &str,
) -> Option<String> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    if ui.selectable_label(col == current, col).clicked() && col != current {
                        picked = Some(col.clone());
                    }
                }
            });
    });
    picked
}

// ---------------------------------------------------------------------------
// Banners
// ---------------------------------------------------------------------------

/// A full-width coloured message box.
pub fn banner(ui: &mut Ui, severity: Severity, message: &str) {
    let (fill, text) = match severity {
        Severity::Success => (rgb(0x1E, 0x4D, 0x2B), rgb(0xC8, 0xF7, 0xD3)),
        Severity::Info => (rgb(0x1C, 0x3D, 0x5A), rgb(0xC7, 0xE2, 0xFF)),
        Severity::Warning => (rgb(0x5A, 0x4A, 0x12), rgb(0xFF, 0xEB, 0xA8)),
        Severity::Error => (rgb(0x5C, 0x1F, 0x1F), rgb(0xFF, 0xC9, 0xC9)),
    };
    egui::Frame::group(ui.style())
        .fill(fill)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(message).color(text));
        });
}

fn rgb(r: u8, g: u8, b: u8) -> Color32 {
    Color32::from_rgb(r, g, b)
}
