use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://oedi-data-lake.s3.amazonaws.com/nrel-pds-building-stock/end-use-load-profiles-for-us-building-stock";
pub const STATEWIDE_LABEL: &str = "Michigan (statewide)";
pub const EXPORT_FILE_NAME: &str = "eulpdownload.csv";

/// Fixed coordinates of the data lake release the explorer reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub base_url: String,
    pub year: String,
    pub release: String,
    pub dataset_kind: String,
    pub state_code: String,
    pub statewide_label: String,
    /// Request timeout; `None` leaves the client without one.
    pub timeout_secs: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            year: "2024".to_string(),
            release: "comstock_amy2018_release_2".to_string(),
            dataset_kind: "timeseries_aggregates".to_string(),
            state_code: "MI".to_string(),
            statewide_label: STATEWIDE_LABEL.to_string(),
            timeout_secs: None,
        }
    }
}

impl DatasetConfig {
    /// Load overrides from a TOML file; missing keys keep their defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn is_statewide(&self, county: &str) -> bool {
        county == self.statewide_label
    }

    /// `<base>/<year>/<release>/<dataset kind>`
    pub fn release_root(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.year,
            self.release,
            self.dataset_kind
        )
    }
}
