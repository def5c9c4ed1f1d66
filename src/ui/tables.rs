use eframe::egui::{self, Align, Layout, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::CellValue;
use crate::data::stats::DescriptiveStats;
use crate::data::summary::{ColumnSummary, Preview, Report};
use crate::error::Severity;
use crate::ui::page::banner;

// ---------------------------------------------------------------------------
// Summary sections
// ---------------------------------------------------------------------------

/// Overview, missing-data and statistics sections, each failing on its own.
pub fn report(ui: &mut Ui, report: &Report, file: &str) {
    ui.add_space(12.0);
    ui.heading(format!("Dataset Overview - {file}"));
    match &report.preview {
        Ok(preview) => {
            ui.strong(format!("First {} Rows:", preview.rows.len()));
            preview_table(ui, preview);
        }
        Err(e) => banner(ui, Severity::Error, &e.to_string()),
    }

    ui.add_space(12.0);
    ui.heading("🔍 Missing Data Check");
    missing_table(ui, &report.missing);

    ui.add_space(12.0);
    ui.heading("📈 Descriptive Statistics");
    match &report.statistics {
        Ok(stats) if stats.is_empty() => {
            banner(ui, Severity::Info, "No numeric columns to describe.");
        }
        Ok(stats) => stats_table(ui, stats),
        Err(e) => banner(ui, Severity::Error, &e.to_string()),
    }
}

fn preview_table(ui: &mut Ui, preview: &Preview) {
    let mut header = vec![String::new()];
    header.extend(preview.columns.iter().cloned());
    let rows: Vec<Vec<String>> = preview
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            std::iter::once(i.to_string())
                .chain(row.iter().map(format_cell))
                .collect()
        })
        .collect();
    grid(ui, "preview_table", &header, &rows);
}

fn missing_table(ui: &mut Ui, missing: &[ColumnSummary]) {
    let header = vec!["Column".to_string(), "Missing Values".to_string()];
    let rows: Vec<Vec<String>> = missing
        .iter()
        .map(|m| vec![m.column.clone(), m.missing.to_string()])
        .collect();
    grid(ui, "missing_table", &header, &rows);
}

/// One row per statistic, one column per numeric column, like `describe()`.
fn stats_table(ui: &mut Ui, stats: &DescriptiveStats) {
    let mut header = vec![String::new()];
    header.extend(stats.columns.iter().map(|c| c.name.clone()));

    let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let rows: Vec<Vec<String>> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            std::iter::once(label.to_string())
                .chain(stats.columns.iter().map(|c| format_stat(c.rows()[i].1)))
                .collect()
        })
        .collect();
    grid(ui, "stats_table", &header, &rows);
}

fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => "NaN".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Generic striped table
// ---------------------------------------------------------------------------

fn grid(ui: &mut Ui, id: &str, header: &[String], rows: &[Vec<String>]) {
    ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        ui.push_id(id, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(TableColumn::auto().at_least(60.0), header.len())
                .header(22.0, |mut head| {
                    for name in header {
                        head.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        body.row(20.0, |mut table_row| {
                            for cell in row {
                                table_row.col(|ui: &mut Ui| {
                                    ui.add(egui::Label::new(cell).truncate());
                                });
                            }
                        });
                    }
                });
        });
    });
}
