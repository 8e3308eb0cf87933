//! Configuration loading: defaults, then the TOML file, then environment
//! variables, then command line flags.

use std::path::PathBuf;

use deskboard_api::{DEFAULT_LIMITS, PageLimit};
use deskboard_ui::DEFAULT_SKELETON_ROWS;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const ENV_CONFIG: &str = "DESKBOARD_CONFIG";
pub const ENV_BASE_URL: &str = "DESKBOARD_BASE_URL";
pub const ENV_TOKEN: &str = "DESKBOARD_TOKEN";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Invalid TOML in {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    /// A page size of zero in `default_limit` or `page_limits`
    #[error("`{0}` must only contain page sizes greater than zero")]
    ZeroLimit(&'static str),
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    /// Rows per page when a listing first opens
    #[serde(default)]
    pub default_limit: Option<usize>,

    /// Choices offered by the rows-per-page control
    #[serde(default)]
    pub page_limits: Option<Vec<usize>>,

    /// Placeholder rows shown while a page loads
    #[serde(default)]
    pub skeleton_rows: Option<usize>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Configuration after every source has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub default_limit: PageLimit,
    /// Sorted, deduplicated and always containing `default_limit`
    pub page_limits: Vec<PageLimit>,
    pub skeleton_rows: usize,
    pub log_file: PathBuf,
    pub demo: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            default_limit: PageLimit::DEFAULT,
            page_limits: DEFAULT_LIMITS.to_vec(),
            skeleton_rows: DEFAULT_SKELETON_ROWS,
            log_file: default_log_path(),
            demo: false,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "deskboard")
}

/// `deskboard.log` in the platform's local data directory, or the working
/// directory when none can be determined
#[must_use]
pub fn default_log_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("deskboard.log"),
        |dirs| dirs.data_local_dir().join("deskboard.log"),
    )
}

#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load a config file. A missing file is not an error.
pub fn load_config_file(
    path: impl Into<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        ConfigError::ReadError {
            path: path.clone(),
            reason: e.to_string(),
        }
    })?;

    let config = toml::from_str(&contents).map_err(|e| {
        ConfigError::ParseError {
            path: path.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok(Some(config))
}

/// Load from `config_path` (the `--config` flag, which clap already fills
/// from `DESKBOARD_CONFIG`), falling back to the default location
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }
    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }
    match default_config_path() {
        Some(path) => load_config_file(path),
        None => Ok(None),
    }
}

fn page_limit(n: usize, key: &'static str) -> Result<PageLimit, ConfigError> {
    PageLimit::new(n).map_err(|_| ConfigError::ZeroLimit(key))
}

/// Lay the file's values over the defaults
pub fn merge_config(
    config_file: Option<ConfigFile>,
) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();
    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let default_limit = match config.default_limit {
        Some(n) => page_limit(n, "default_limit")?,
        None => defaults.default_limit,
    };
    let mut page_limits = match config.page_limits {
        Some(limits) if !limits.is_empty() => limits
            .into_iter()
            .map(|n| page_limit(n, "page_limits"))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) | None => defaults.page_limits,
    };
    if !page_limits.contains(&default_limit) {
        page_limits.push(default_limit);
    }
    page_limits.sort_unstable();
    page_limits.dedup();

    Ok(ResolvedConfig {
        base_url: config.base_url.unwrap_or(defaults.base_url),
        token: config.token.or(defaults.token),
        default_limit,
        page_limits,
        skeleton_rows: config.skeleton_rows.unwrap_or(defaults.skeleton_rows),
        log_file: config.log_file.unwrap_or(defaults.log_file),
        demo: defaults.demo,
    })
}

/// `DESKBOARD_BASE_URL` and `DESKBOARD_TOKEN`
#[must_use]
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(base_url) = std::env::var(ENV_BASE_URL)
        && !base_url.trim().is_empty()
    {
        config.base_url = base_url;
    }
    if let Ok(token) = std::env::var(ENV_TOKEN)
        && !token.trim().is_empty()
    {
        config.token = Some(token);
    }
    config
}

/// Flags set on the command line win over every other source
#[must_use]
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: &Cli) -> ResolvedConfig {
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if cli.demo {
        config.demo = true;
    }
    config
}

/// Run the whole precedence chain for `cli`
pub fn resolve(cli: &Cli) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(cli.config.clone())?;
    let config = apply_env_overrides(merge_config(file)?);
    Ok(apply_cli_overrides(config, cli))
}
