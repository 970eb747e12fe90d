use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::{Island, Measurement, Species};

/// Env var naming the config file; overrides the working-directory default.
pub const CONFIG_ENV: &str = "PENGUIN_DASH_CONFIG";

/// Looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "penguin-dash.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the file.
///
/// ```json
/// {
///   "title": "Palmer Penguins",
///   "data_path": "penguins.csv",
///   "default_islands": ["Dream"],
///   "bar_bins": 25
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Window title.
    pub title: String,
    /// Dataset file; the bundled dataset is used when absent.
    pub data_path: Option<PathBuf>,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Species checked at startup. Unknown names are ignored.
    pub default_species: Vec<String>,
    /// Islands checked at startup. Unknown names are ignored.
    pub default_islands: Vec<String>,
    pub default_measurement: Measurement,
    /// Bin count for the attribute histogram.
    pub bar_bins: usize,
    /// Bin count for the species-stacked histogram (1..=50).
    pub stacked_bins: usize,
    pub map_center: Island,
    /// Half-width of the map viewport around the centre, in degrees.
    pub map_span_degrees: f64,
    /// Hyperlink shown at the bottom of the sidebar.
    pub repo_link: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Palmer Penguins".to_string(),
            data_path: None,
            window_size: [1400.0, 900.0],
            default_species: Species::ALL.iter().map(|s| s.to_string()).collect(),
            default_islands: vec![Island::Dream.to_string()],
            default_measurement: Measurement::BillLength,
            bar_bins: 25,
            stacked_bins: 5,
            map_center: Island::Biscoe,
            map_span_degrees: 2.0,
            repo_link: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration.
    ///
    /// Checks `PENGUIN_DASH_CONFIG` first, then `penguin-dash.json` in the
    /// current directory. A missing default file yields the defaults; a file
    /// named explicitly through the env var must exist.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(text)?;
        config.bar_bins = config.bar_bins.max(1);
        config.stacked_bins = config.stacked_bins.clamp(1, 50);
        Ok(config)
    }
}
