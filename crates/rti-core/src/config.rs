use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::feed::TimeWindow;
use crate::retry::RetryPolicy;
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per image fetch (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/rti/config.toml`.
///
/// The subreddit/window/limit defaults apply when the `top` command is run
/// without the corresponding flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtiConfig {
    /// Subreddits fetched when none are given on the command line.
    pub default_subreddits: Vec<String>,
    /// Ranking window fetched when `--period` is not given.
    pub default_window: TimeWindow,
    /// Post count fetched per subreddit when `--limit` is not given.
    pub default_limit: u32,
    /// Download directory; None means `$HOME/reddit_pics`.
    #[serde(default)]
    pub destination: Option<String>,
    /// Number of posts processed concurrently (1 = strictly sequential).
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Use the full URL path segment for filenames instead of the short tail.
    #[serde(default)]
    pub long_names: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_jobs() -> usize {
    1
}

impl Default for RtiConfig {
    fn default() -> Self {
        Self {
            default_subreddits: vec!["aww".to_string()],
            default_window: TimeWindow::Week,
            default_limit: 15,
            destination: None,
            jobs: 1,
            long_names: false,
            retry: None,
        }
    }
}

impl RtiConfig {
    /// The effective retry policy: the `[retry]` table if present, else defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rti")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RtiConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RtiConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RtiConfig = toml::from_str(&data)?;
    Ok(cfg)
}
