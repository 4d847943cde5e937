//! Configuration errors.

use hfm_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// A `[policies.<algebra>]` entry that cannot be applied.
    #[error("invalid failure policy for '{algebra}': {message}")]
    InvalidPolicy { algebra: String, message: String },
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid policy error.
    pub fn invalid_policy(algebra: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            algebra: algebra.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FAILED",
            Self::ParseToml { .. } => "CONFIG_PARSE_FAILED",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
            Self::InvalidPolicy { .. } => "CONFIG_INVALID_POLICY",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReadFile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfm_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        let parse_err = toml::from_str::<toml::Value>("= broken").err().expect("parse error");
        assert_error_codes(
            &[
                ConfigError::read_file("a", std::io::Error::other("x")),
                ConfigError::parse_toml("a", parse_err),
                ConfigError::invalid_env_var("HFM_MAX_STEPS", "expected integer"),
                ConfigError::invalid_policy("pizza", "retry needs at least one attempt"),
            ],
            "CONFIG_",
        );
    }

    #[test]
    fn env_var_message() {
        let err = ConfigError::invalid_env_var("HFM_DEBUG", "expected bool");
        assert_eq!(
            err.to_string(),
            "invalid value for environment variable 'HFM_DEBUG': expected bool"
        );
    }
}
