//! YAML settings file.
//!
//! Every section is optional; anything left out falls back to the defaults
//! for the USGS `all_month.csv` feed. Command-line flags are applied on top
//! of these values by the command handlers.
//!
//! ```yaml
//! feed:
//!   url: https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.csv
//!   path: all_month.csv
//!   max_line_bytes: 4096
//! columns: { time: 0, magnitude: 4, place: 13 }
//! report:
//!   max_rows: 20
//!   layout: place-last
//!   place: full
//! cost:
//!   per_magnitude: 1000000
//! palette:
//!   severe: "1;31"
//! ```

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    io_utils::{self, DEFAULT_MAX_LINE_BYTES},
    layout::{Layout, PlaceStyle},
    record::FeedColumns,
    stats::LinearCost,
    style::Palette,
};

pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.csv";
pub const DEFAULT_FEED_PATH: &str = "all_month.csv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub feed: FeedSettings,
    pub columns: FeedColumns,
    pub report: ReportSettings,
    pub cost: LinearCost,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedSettings {
    pub url: String,
    pub path: PathBuf,
    /// 0 disables the per-line ceiling.
    pub max_line_bytes: usize,
    pub encoding: Option<String>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            path: PathBuf::from(DEFAULT_FEED_PATH),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            encoding: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Rows shown in the table; `None` shows every valid row.
    pub max_rows: Option<usize>,
    pub layout: Layout,
    pub place: PlaceStyle,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path).with_context(|| format!("Opening settings file {path:?}"))?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .with_context(|| format!("Reading settings file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing settings file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let per_magnitude = self.cost.per_magnitude;
        if !per_magnitude.is_finite() || per_magnitude <= 0.0 {
            bail!("cost.per_magnitude must be a positive number, got {per_magnitude}");
        }
        Ok(())
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn encoding(&self, override_label: Option<&str>) -> Result<&'static encoding_rs::Encoding> {
        io_utils::resolve_encoding(override_label.or(self.feed.encoding.as_deref()))
    }
}
