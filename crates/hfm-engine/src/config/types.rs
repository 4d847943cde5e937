//! Configuration types.

use super::ConfigError;
use crate::policy::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level HFM configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HfmConfig {
    /// Verbose logging in frontends.
    pub debug: bool,

    /// Engine limits and tracing.
    pub engine: EngineSettings,

    /// Failure policies keyed by algebra name.
    pub policies: BTreeMap<String, FailurePolicy>,
}

impl HfmConfig {
    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Checks the policy table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPolicy`] for a blank algebra name or a retry
    /// policy with zero attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (algebra, policy) in &self.policies {
            if algebra.trim().is_empty() {
                return Err(ConfigError::invalid_policy(algebra, "algebra name is empty"));
            }
            if let FailurePolicy::Retry { attempts: 0 } = policy {
                return Err(ConfigError::invalid_policy(
                    algebra,
                    "retry needs at least one attempt",
                ));
            }
        }
        Ok(())
    }

    /// Merges a higher-priority layer into this one.
    ///
    /// Scalar fields are taken from `other` only when they differ from the
    /// default. Policies accumulate; an entry in `other` replaces the entry
    /// for the same algebra.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.engine.merge(&other.engine);

        for (algebra, policy) in &other.policies {
            self.policies.insert(algebra.clone(), *policy);
        }
    }
}

/// Engine limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum child-program nesting depth (the top-level program is 0).
    pub max_depth: usize,

    /// Maximum steps per program level; `0` means unlimited.
    pub max_steps: usize,

    /// Emit a `trace` event for every dispatched command.
    pub trace_commands: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_depth: 16,
            max_steps: 0,
            trace_commands: true,
        }
    }
}

impl EngineSettings {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.max_depth != default.max_depth {
            self.max_depth = other.max_depth;
        }
        if other.max_steps != default.max_steps {
            self.max_steps = other.max_steps;
        }
        if other.trace_commands != default.trace_commands {
            self.trace_commands = other.trace_commands;
        }
    }
}
