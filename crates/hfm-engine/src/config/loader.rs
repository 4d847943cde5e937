//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.hfm/config.toml`)
//! 3. Project config (`<root>/.hfm/config.toml`)
//! 4. Environment variables (`HFM_*`)
//!
//! Each layer overrides the previous.

use super::{default_config_path, ConfigError, HfmConfig, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use hfm_engine::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), hfm_engine::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    global_config_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root; its config is `<root>/.hfm/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed, an `HFM_*` variable holds an invalid value, or the merged
    /// policy table is invalid. Missing files are ignored.
    pub fn load(&self) -> Result<HfmConfig, ConfigError> {
        let mut config = HfmConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project) = load_file(&path)? {
                    debug!(path = %path.display(), "Loaded project config");
                    config.merge(&project);
                }
            }
        }

        if !self.skip_env {
            apply_env(&mut config, |name| std::env::var(name).ok())?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_file(path: &Path) -> Result<Option<HfmConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = HfmConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(config))
}

/// Applies `HFM_*` overrides read through `lookup`.
///
/// | Variable | Field |
/// |----------|-------|
/// | `HFM_DEBUG` | `debug` |
/// | `HFM_MAX_DEPTH` | `engine.max_depth` |
/// | `HFM_MAX_STEPS` | `engine.max_steps` |
/// | `HFM_TRACE_COMMANDS` | `engine.trace_commands` |
fn apply_env(
    config: &mut HfmConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(val) = lookup("HFM_DEBUG") {
        config.debug = parse_bool(&val)
            .ok_or_else(|| ConfigError::invalid_env_var("HFM_DEBUG", "expected bool"))?;
    }
    if let Some(val) = lookup("HFM_TRACE_COMMANDS") {
        config.engine.trace_commands = parse_bool(&val)
            .ok_or_else(|| ConfigError::invalid_env_var("HFM_TRACE_COMMANDS", "expected bool"))?;
    }
    if let Some(val) = lookup("HFM_MAX_DEPTH") {
        config.engine.max_depth = parse_number("HFM_MAX_DEPTH", &val)?;
    }
    if let Some(val) = lookup("HFM_MAX_STEPS") {
        config.engine.max_steps = parse_number("HFM_MAX_STEPS", &val)?;
    }
    Ok(())
}

/// Accepts "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_number<T: FromStr>(name: &str, s: &str) -> Result<T, ConfigError> {
    s.trim()
        .parse()
        .map_err(|_| ConfigError::invalid_env_var(name, "expected non-negative integer"))
}
