use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::charts::{AxisValues, ChartData, ChartKind, ChartSpec, ColorScale};
use crate::color::Theme;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// Chart panel
// ---------------------------------------------------------------------------

/// Draw one chart specification. `id` keeps plot state apart between panels.
pub fn chart(ui: &mut Ui, id: usize, spec: &ChartSpec, height: f32) {
    let theme = Theme::for_template(spec.template);

    egui::Frame::group(ui.style())
        .fill(theme.background)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(&spec.title).color(theme.text).strong().size(16.0));
            match &spec.data {
                ChartData::Series { x, y, .. } => series_plot(ui, id, spec, x, y, &theme, height),
                ChartData::Matrix {
                    labels,
                    values,
                    color_scale,
                } => heatmap_plot(ui, id, spec, labels, values, *color_scale, height),
            }
        });

    if ui.small_button("Copy spec as JSON").clicked() {
        match spec.to_json() {
            Ok(json) => ui.ctx().copy_text(json),
            Err(e) => log::error!("Failed to serialize chart spec: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Line / bar series
// ---------------------------------------------------------------------------

/// How plot coordinates are turned back into tick labels.
#[derive(Debug, Clone, PartialEq)]
enum AxisFormat {
    Numeric,
    /// Days since the Unix epoch.
    Date,
    /// Index into the category list.
    Categories(Vec<String>),
}

impl AxisFormat {
    fn label(&self, v: f64) -> String {
        match self {
            AxisFormat::Numeric => format_number(v),
            AxisFormat::Date => DateTime::from_timestamp((v * SECONDS_PER_DAY) as i64, 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            AxisFormat::Categories(labels) => label_at(labels, v),
        }
    }
}

/// Map axis values to plot coordinates.
fn axis_positions(values: &AxisValues) -> (Vec<f64>, AxisFormat) {
    match values {
        AxisValues::Numbers(v) => (v.clone(), AxisFormat::Numeric),
        AxisValues::Dates(v) => (v.iter().map(days_since_epoch).collect(), AxisFormat::Date),
        AxisValues::Categories(v) => {
            let mut index: HashMap<&str, usize> = HashMap::new();
            let mut labels = Vec::new();
            let positions = v
                .iter()
                .map(|label| {
                    let next = index.len();
                    let pos = *index.entry(label.as_str()).or_insert_with(|| {
                        labels.push(label.clone());
                        next
                    });
                    pos as f64
                })
                .collect();
            (positions, AxisFormat::Categories(labels))
        }
    }
}

fn days_since_epoch(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}

fn series_plot(
    ui: &mut Ui,
    id: usize,
    spec: &ChartSpec,
    x: &AxisValues,
    y: &AxisValues,
    theme: &Theme,
    height: f32,
) {
    let (xs, x_format) = axis_positions(x);
    let (ys, y_format) = axis_positions(y);
    let hover_x = x_format.clone();
    let hover_y = y_format.clone();
    let x_title = spec.x_title.clone();
    let y_title = spec.y_title.clone();

    let plot = Plot::new(("chart", id))
        .height(height)
        .legend(Legend::default())
        .x_axis_label(spec.x_title.as_str())
        .y_axis_label(spec.y_title.as_str())
        .x_axis_formatter(move |mark, _range| x_format.label(mark.value))
        .y_axis_formatter(move |mark, _range| y_format.label(mark.value))
        .label_formatter(move |_name, point| {
            format!(
                "{x_title}: {}\n{y_title}: {}",
                hover_x.label(point.x),
                hover_y.label(point.y)
            )
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    match spec.kind {
        ChartKind::Bar => {
            let width = bar_width(&xs);
            let bars: Vec<Bar> = xs
                .iter()
                .zip(&ys)
                .map(|(&xi, &yi)| Bar::new(xi, yi).width(width))
                .collect();
            let chart = BarChart::new(bars).color(theme.series).name(&spec.y_title);
            plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
        }
        _ => {
            let points: PlotPoints = xs.iter().zip(&ys).map(|(&xi, &yi)| [xi, yi]).collect();
            let line = Line::new(points)
                .name(&spec.y_title)
                .color(theme.series)
                .width(1.5);
            plot.show(ui, |plot_ui| plot_ui.line(line));
        }
    }
}

/// 80% of the smallest gap between neighbouring x values.
fn bar_width(xs: &[f64]) -> f64 {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .fold(None, |min: Option<f64>, gap| Some(min.map_or(gap, |m| m.min(gap))))
        .map_or(0.8, |gap| gap * 0.8)
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

fn heatmap_plot(
    ui: &mut Ui,
    id: usize,
    spec: &ChartSpec,
    labels: &[String],
    values: &[Vec<Option<f64>>],
    scale: ColorScale,
    height: f32,
) {
    let x_labels = labels.to_vec();
    let y_labels = labels.to_vec();
    let hover_labels = labels.to_vec();
    let hover_values = values.to_vec();

    Plot::new(("heatmap", id))
        .height(height)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label(spec.x_title.as_str())
        .y_axis_label(spec.y_title.as_str())
        .x_axis_formatter(move |mark, _range| label_at(&x_labels, mark.value))
        .y_axis_formatter(move |mark, _range| label_at(&y_labels, mark.value))
        .label_formatter(move |_name, point| {
            let (col, row) = (point.x.round(), point.y.round());
            if col < 0.0 || row < 0.0 {
                return String::new();
            }
            let (col, row) = (col as usize, row as usize);
            match (hover_labels.get(row), hover_labels.get(col)) {
                (Some(r), Some(c)) => {
                    let value = hover_values
                        .get(row)
                        .and_then(|cells| cells.get(col))
                        .copied()
                        .flatten()
                        .map(|v| format!("{v:.3}"))
                        .unwrap_or_else(|| "undefined".to_string());
                    format!("{r} × {c}: {value}")
                }
                _ => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for (row, cells) in values.iter().enumerate() {
                for (col, value) in cells.iter().enumerate() {
                    // Undefined coefficients are left as gaps.
                    let Some(v) = value else { continue };
                    let fill = scale.for_correlation(*v);
                    let (x, y) = (col as f64, row as f64);
                    let square = PlotPoints::new(vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]);
                    plot_ui.polygon(
                        Polygon::new(square)
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, fill)),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(format!("{v:.2}")).color(contrast(fill)),
                    ));
                }
            }
        });
}

/// Label of the category at integer position `v`; blank between positions.
fn label_at(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn contrast(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn format_number(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{v:.2e}")
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_category_positions_follow_first_appearance() {
        let x = AxisValues::Categories(vec!["b".into(), "a".into(), "b".into()]);
        let (xs, format) = axis_positions(&x);
        assert_eq!(xs, vec![0.0, 1.0, 0.0]);
        assert_eq!(format, AxisFormat::Categories(vec!["b".into(), "a".into()]));
        assert_eq!(format.label(1.0), "a");
        assert_eq!(format.label(0.5), "");
    }

    #[test]
    fn test_date_axis_round_trips_to_label() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let (xs, format) = axis_positions(&AxisValues::Dates(vec![dt]));
        assert_eq!(format.label(xs[0]), "2024-03-04");
    }

    #[test]
    fn test_text_values_label_the_y_axis() {
        let y = AxisValues::Categories(vec!["INFY".into(), "TCS".into()]);
        let (ys, format) = axis_positions(&y);
        assert_eq!(ys, vec![0.0, 1.0]);
        assert_eq!(format.label(ys[1]), "TCS");
        assert_eq!(AxisFormat::Numeric.label(12.346), "12.35");
    }

    #[test]
    fn test_bar_width_uses_smallest_gap() {
        assert_eq!(bar_width(&[0.0, 1.0, 3.0]), 0.8);
        assert!((bar_width(&[10.0, 10.5, 20.0]) - 0.4).abs() < 1e-12);
        assert_eq!(bar_width(&[5.0]), 0.8);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.346), "12.35");
        assert_eq!(format_number(2_500_000.0), "2.50e6");
        assert_eq!(format_number(0.0), "0.00");
    }
}
