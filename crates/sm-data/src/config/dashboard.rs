//! Dashboard configuration file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::null_handling::NullConfig;
use crate::{DataError, Result};

/// Everything the dashboard reads at startup. Every field has a default, so an
/// empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Stakeholder CSV
    pub data_path: PathBuf,
    /// Geocode cache JSON
    pub cache_path: PathBuf,
    /// Window title
    pub title: String,
    /// Heading shown above the map
    pub heading: String,
    /// Columns of the visible-stakeholders table
    pub table_columns: Vec<String>,
    pub page_size: usize,
    /// Initial map centre as `[lat, lon]`
    pub map_center: [f64; 2],
    /// Recipient of the submission email
    pub submission_email: String,
    pub submission_subject: String,
    pub null_values: NullConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("stakeholders.csv"),
            cache_path: PathBuf::from("geocoded_cache.json"),
            title: "Extrusion Stakeholder Map".to_string(),
            heading: "Food & Feed Extrusion - Global Stakeholder Network".to_string(),
            table_columns: ["Name", "Position", "Affiliation", "Country", "Category", "Status"]
                .into_iter()
                .map(String::from)
                .collect(),
            page_size: 10,
            map_center: [20.0, 0.0],
            submission_email: "jordan.pennells@csiro.au".to_string(),
            submission_subject: "New Extrusion Symposium Stakeholder".to_string(),
            null_values: NullConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| DataError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        info!(path = %path.display(), "dashboard configuration loaded");
        Ok(config)
    }

    /// Load `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| DataError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.page_size == 0 {
            return Err(invalid("page_size must be at least 1"));
        }
        if self.table_columns.is_empty() {
            return Err(invalid("table_columns must name at least one column"));
        }
        let [lat, lon] = self.map_center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("map_center must be a [lat, lon] pair in degrees"));
        }
        Ok(())
    }
}
