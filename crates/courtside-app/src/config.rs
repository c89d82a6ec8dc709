// Configuration loading and validation (config/courtside.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const CONFIG_FILE: &str = "courtside.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// courtside.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub images: ImageConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Stats backend serving `/basketball-stats` and `/player-progression/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    pub base_url: String,
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_start_year")]
    pub default_start_year: i32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig {
            default_start_year: default_start_year(),
        }
    }
}

/// Local dataset. When `roster_csv` is set the CSV provider is used instead
/// of the HTTP backend. `season` picks the roster year out of a multi-season
/// export; without it the latest year in the file is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    pub roster_csv: Option<String>,
    pub season: Option<i32>,
}

fn default_api_timeout() -> u64 {
    30
}

fn default_image_timeout() -> u64 {
    5
}

fn default_cache_capacity() -> u64 {
    1_000
}

fn default_start_year() -> i32 {
    2022
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/courtside.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/courtside.toml` from `defaults/courtside.toml` when it does
/// not exist yet. Returns the path written, or `None` when the config was
/// already there. An existing config is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} and no defaults/{CONFIG_FILE} in {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_err)?;
    }
    std::fs::copy(&source, &target).map_err(copy_err)?;
    info!("seeded {} from defaults", target.display());

    Ok(Some(target))
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

/// Load config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_in(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(invalid(field, format!("must be an http(s) URL, got '{url}'")));
    }
    Ok(())
}

fn check_season_year(field: &str, year: i32) -> Result<(), ConfigError> {
    if !(1990..=2100).contains(&year) {
        return Err(invalid(
            field,
            format!("must be a season year between 1990 and 2100, got {year}"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    check_url("api.base_url", &config.api.base_url)?;
    check_url("images.base_url", &config.images.base_url)?;

    let timeouts: &[(&str, u64)] = &[
        ("api.timeout_secs", config.api.timeout_secs),
        ("images.timeout_secs", config.images.timeout_secs),
    ];
    for (name, val) in timeouts {
        if *val == 0 {
            return Err(invalid(name, "must be > 0"));
        }
    }

    if config.images.cache_capacity == 0 {
        return Err(invalid("images.cache_capacity", "must be > 0"));
    }

    check_season_year(
        "progression.default_start_year",
        config.progression.default_start_year,
    )?;
    if let Some(season) = config.data.season {
        check_season_year("data.season", season)?;
    }

    if config
        .data
        .roster_csv
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(invalid("data.roster_csv", "must not be empty when set"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
