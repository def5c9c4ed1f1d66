use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page title.
    pub title: String,
    /// Directory scanned for datasets.
    pub data_dir: PathBuf,
    /// Recognized tabular file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Number of rows in the data preview.
    pub preview_rows: usize,
    pub charts: ChartConfig,
}

/// Initial toggle state and layout of the chart panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub show_close_price: bool,
    pub show_volume: bool,
    pub show_correlation: bool,
    pub custom_analysis: bool,
    /// Height of each chart panel in points.
    pub height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "📊 Stock Market Analysis Dashboard for Nifty 50".to_string(),
            data_dir: PathBuf::from("data"),
            extensions: vec!["csv".to_string()],
            preview_rows: 5,
            charts: ChartConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            show_close_price: true,
            show_volume: true,
            show_correlation: true,
            custom_analysis: true,
            height: 320.0,
        }
    }
}

impl DashboardConfig {
    /// Load `dashboard.toml` from the working directory, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`. A missing file yields the defaults;
    /// keys absent from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            toml::from_str::<DashboardConfig>(&content)
                .with_context(|| format!("Failed to parse config file at {}", path.display()))?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            DashboardConfig::default()
        };

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.preview_rows == 0 {
            bail!("preview_rows must be at least 1");
        }
        if self.extensions.is_empty() {
            bail!("extensions must list at least one file extension");
        }
        if let Some(ext) = self.extensions.iter().find(|e| e.trim().is_empty()) {
            bail!("extensions contains an empty entry: {ext:?}");
        }
        if !(self.charts.height > 0.0) {
            bail!("charts.height must be positive, got {}", self.charts.height);
        }
        Ok(())
    }
}
