//! Dashboard configuration.
//!
//! Built-in defaults, then an optional TOML file, then command-line
//! overrides applied by `main`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::loader::DataSources;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "FE_DASHBOARD_CONFIG";

const DEFAULT_TWEETS: &str =
    "https://drive.google.com/file/d/1oq_J-r9psIY8xPwsY2u2Hal_NF21ATec/view?usp=sharing";
const DEFAULT_DAILY: &str =
    "https://raw.githubusercontent.com/zackfair1/fe_analysis/main/data_by_year.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// URL or path of the per-tweet table.
    pub tweets_source: String,
    /// URL or path of the per-day table.
    pub daily_source: String,
    /// Initial year selection.
    pub default_years: [i32; 2],
    /// Initial like inputs.
    pub default_likes: [i64; 2],
    /// Artificial delay before the like inputs are sanitised, in ms.
    pub sanitize_delay_ms: u64,
    pub title: String,
    pub repo_url: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tweets_source: DEFAULT_TWEETS.to_string(),
            daily_source: DEFAULT_DAILY.to_string(),
            default_years: [2015, 2017],
            default_likes: [0, 25000],
            sanitize_delay_ms: 1500,
            title: "Twitter - The Flat Earth theory discovery".to_string(),
            repo_url: "https://github.com/zackfair1/fe_analysis".to_string(),
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit path. Unlike the environment lookup, a missing
    /// file here is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit`, else from `$FE_DASHBOARD_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn sources(&self) -> DataSources {
        DataSources {
            tweets: self.tweets_source.clone(),
            daily: self.daily_source.clone(),
        }
    }

    pub fn sanitize_delay(&self) -> Duration {
        Duration::from_millis(self.sanitize_delay_ms)
    }
}
