//! Configuration management with hierarchical layering.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────┐
//! │  1. Environment Variables (HFM_*)       │  Runtime override
//! ├─────────────────────────────────────────┤
//! │  2. Project Config (.hfm/config.toml)   │  Project-specific
//! ├─────────────────────────────────────────┤
//! │  3. Global Config (~/.hfm/config.toml)  │  User defaults
//! ├─────────────────────────────────────────┤
//! │  4. Default Values (compile-time)       │  Fallback
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [engine]
//! max_depth = 16
//! max_steps = 0          # unlimited
//! trace_commands = true
//!
//! [policies.pizza]
//! kind = "retry"
//! attempts = 3
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{EngineSettings, HfmConfig};

/// Project-local config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".hfm";

/// Config file name inside global and project directories.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

/// Default global config directory (`~/.hfm`).
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join(PROJECT_CONFIG_FILE)
}
