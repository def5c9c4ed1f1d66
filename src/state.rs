use std::path::PathBuf;

use crate::config::DashboardConfig;
use crate::pipeline::{self, RenderPass, RenderRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The widget state owned by the UI, plus the page from the last pass.
pub struct AppState {
    pub config: DashboardConfig,

    /// Current control values. Widgets edit this; a pass reads it.
    pub request: RenderRequest,

    /// Page produced by the last render pass.
    pub page: Option<RenderPass>,

    /// Set by any interaction; cleared once the pass has re-run.
    dirty: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let request = RenderRequest::from_config(&config);
        Self {
            config,
            request,
            page: None,
            dirty: true,
        }
    }

    /// Re-run the pipeline if anything changed since the last pass.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        let page = pipeline::run(&self.config, &self.request);
        // Pin the selector to what the pass actually loaded.
        self.request.selected_file = page.selected_file.clone();
        self.page = Some(page);
        self.dirty = false;
    }

    /// Force a fresh pass even though no control changed.
    pub fn reload(&mut self) {
        self.dirty = true;
    }

    pub fn select_dataset(&mut self, name: String) {
        if self.request.selected_file.as_deref() != Some(name.as_str()) {
            self.request.selected_file = Some(name);
            self.dirty = true;
        }
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Switching data directory to {}", dir.display());
        self.request.data_dir = dir;
        self.request.selected_file = None;
        self.dirty = true;
    }

    pub fn set_custom_x(&mut self, column: String) {
        self.request.axes.x = Some(column);
        self.dirty = true;
    }

    pub fn set_custom_y(&mut self, column: String) {
        self.request.axes.y = Some(column);
        self.dirty = true;
    }

    /// Call after a toggle widget reports a change.
    pub fn mark_changed(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
