//! One render pass: locate → load → validate → summarize → configure charts.
//!
//! [`run`] depends only on the configuration, the request and the files on
//! disk. The UI rebuilds a [`RenderRequest`] on every interaction and runs it.

use std::path::PathBuf;

use crate::charts::configurator::{self, ChartToggles, CustomAxes};
use crate::charts::ChartPanel;
use crate::config::DashboardConfig;
use crate::data::summary::{self, Report};
use crate::data::{loader, locator};
use crate::error::{PipelineError, Severity};

/// Everything the user can choose, captured once per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub data_dir: PathBuf,
    pub selected_file: Option<String>,
    pub toggles: ChartToggles,
    pub axes: CustomAxes,
}

impl RenderRequest {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            selected_file: None,
            toggles: ChartToggles {
                close_price: config.charts.show_close_price,
                volume: config.charts.show_volume,
                correlation: config.charts.show_correlation,
                custom_analysis: config.charts.custom_analysis,
            },
            axes: CustomAxes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
}

/// The page produced by one pass, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub title: String,
    /// Files offered in the dataset selector.
    pub datasets: Vec<String>,
    pub selected_file: Option<String>,
    /// Columns offered in the custom-chart selectors.
    pub columns: Vec<String>,
    /// Custom-chart axes after defaults were applied.
    pub axes: Option<(String, String)>,
    pub banner: Banner,
    pub report: Option<Report>,
    pub charts: Vec<ChartPanel>,
}

impl RenderPass {
    fn halted(
        title: String,
        datasets: Vec<String>,
        selected: Option<String>,
        err: PipelineError,
    ) -> Self {
        log::error!("Render pass halted: {err}");
        RenderPass {
            title,
            datasets,
            selected_file: selected,
            columns: Vec::new(),
            axes: None,
            banner: Banner {
                severity: err.severity(),
                message: err.to_string(),
            },
            report: None,
            charts: Vec::new(),
        }
    }
}

/// Execute one full render pass.
pub fn run(config: &DashboardConfig, request: &RenderRequest) -> RenderPass {
    let title = config.title.clone();

    let datasets = match locator::list_datasets(&request.data_dir, &config.extensions) {
        Ok(names) => names,
        Err(e) => return RenderPass::halted(title, Vec::new(), None, e),
    };
    let Some(selected) =
        locator::select_dataset(&datasets, request.selected_file.as_deref()).map(str::to_string)
    else {
        let err = PipelineError::EmptyDirectory(request.data_dir.display().to_string());
        return RenderPass::halted(title, datasets, None, err);
    };

    let dataset = match loader::load_dataset(&request.data_dir, &selected)
        .and_then(loader::validate)
    {
        Ok(ds) => ds,
        Err(e) => return RenderPass::halted(title, datasets, Some(selected), e),
    };

    let report = summary::build_report(&dataset, config.preview_rows);
    let charts = configurator::configure_charts(&dataset, &request.toggles, &request.axes);
    let axes = configurator::resolve_custom_axes(&dataset, &request.axes);

    RenderPass {
        title,
        datasets,
        banner: Banner {
            severity: Severity::Success,
            message: format!("Dataset '{selected}' successfully loaded!"),
        },
        selected_file: Some(selected),
        columns: dataset.column_names(),
        axes,
        report: Some(report),
        charts,
    }
}
