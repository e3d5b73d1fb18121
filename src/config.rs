//! Application-level configuration loading: default board columns, the column
//! cap, persistence timings, and the search proxy endpoint.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::board::{
    ColumnTemplate, DEFAULT_COLUMN_COMPLETED, DEFAULT_COLUMN_PLAYING, DEFAULT_COLUMN_TO_PLAY,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BACKLOG_BOARD_CONFIG_PATH";
/// Environment variable naming the search proxy endpoint.
const SEARCH_ENDPOINT_ENV: &str = "SEARCH_PROXY_URL";

/// Hard cap on the number of columns a board may hold.
const DEFAULT_MAX_COLUMNS: usize = 5;
/// Trailing-edge debounce window for remote board writes.
const DEFAULT_DEBOUNCE_MS: u64 = 1_000;
/// How long the "saved" indicator stays up before reverting to idle.
const DEFAULT_SAVED_DISPLAY_MS: u64 = 2_000;
/// Bounded wait for the initial remote board load when linking an identity.
const DEFAULT_INITIAL_LOAD_TIMEOUT_MS: u64 = 3_000;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Columns seeded into every fresh board.
    pub default_columns: Vec<ColumnTemplate>,
    /// Maximum column count per board.
    pub max_columns: usize,
    /// Debounce window before a board snapshot is flushed.
    pub save_debounce: Duration,
    /// Display interval of the saved status before auto-reverting to idle.
    pub saved_display: Duration,
    /// Bounded wait for the initial board load on identity link.
    pub initial_load_timeout: Duration,
    /// Search proxy endpoint; search is disabled when absent.
    pub search_endpoint: Option<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in
    /// defaults, then apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        columns = config.default_columns.len(),
                        "loaded configuration from file"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(endpoint) = env::var(SEARCH_ENDPOINT_ENV)
            && !endpoint.is_empty()
        {
            config.search_endpoint = Some(endpoint);
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_columns: default_columns(),
            max_columns: DEFAULT_MAX_COLUMNS,
            save_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            saved_display: Duration::from_millis(DEFAULT_SAVED_DISPLAY_MS),
            initial_load_timeout: Duration::from_millis(DEFAULT_INITIAL_LOAD_TIMEOUT_MS),
            search_endpoint: None,
        }
    }
}

/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    columns: Option<Vec<RawColumn>>,
    #[serde(default)]
    max_columns: Option<usize>,
    #[serde(default)]
    save_debounce_ms: Option<u64>,
    #[serde(default)]
    saved_display_ms: Option<u64>,
    #[serde(default)]
    initial_load_timeout_ms: Option<u64>,
    #[serde(default)]
    search_endpoint: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            default_columns: value
                .columns
                .map(|columns| columns.into_iter().map(Into::into).collect())
                .unwrap_or(defaults.default_columns),
            max_columns: value.max_columns.unwrap_or(defaults.max_columns),
            save_debounce: value
                .save_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.save_debounce),
            saved_display: value
                .saved_display_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.saved_display),
            initial_load_timeout: value
                .initial_load_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_load_timeout),
            search_endpoint: value.search_endpoint,
        }
    }
}

/// JSON representation of a single default column entry.
#[derive(Debug, Deserialize)]
struct RawColumn {
    id: String,
    title: String,
    icon: String,
}

impl From<RawColumn> for ColumnTemplate {
    fn from(value: RawColumn) -> Self {
        Self {
            id: value.id,
            title: value.title,
            icon: value.icon,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in column set shipped with the binary.
fn default_columns() -> Vec<ColumnTemplate> {
    vec![
        ColumnTemplate {
            id: DEFAULT_COLUMN_TO_PLAY.to_string(),
            title: "To Play".to_string(),
            icon: "stack".to_string(),
        },
        ColumnTemplate {
            id: DEFAULT_COLUMN_PLAYING.to_string(),
            title: "Playing".to_string(),
            icon: "gamepad".to_string(),
        },
        ColumnTemplate {
            id: DEFAULT_COLUMN_COMPLETED.to_string(),
            title: "Completed".to_string(),
            icon: "trophy".to_string(),
        },
    ]
}
