//! Per-algebra failure handling for supervised child programs.
//!
//! The engine never retries or swallows a failure on its own. A parent
//! algebra that wants either asks for it by running its child through
//! [`StepContext::supervise_child`](crate::StepContext::supervise_child),
//! which consults the policy configured for the *child* algebra.
//!
//! | Policy | Behaviour |
//! |--------|-----------|
//! | `Propagate` | One attempt; failure becomes the parent step's failure |
//! | `Retry { attempts }` | Rebuild and rerun while the failure is recoverable |
//! | `Recover` | Hand the failure back as [`ChildOutcome::Recovered`] |
//!
//! # Example TOML
//!
//! ```toml
//! [policies.pizza]
//! kind = "retry"
//! attempts = 3
//!
//! [policies.sandwich]
//! kind = "recover"
//! ```

use crate::error::{ExecutionError, FailureCause};
use serde::{Deserialize, Serialize};

/// How failures of a supervised child program are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Surface the failure as the parent step's failure.
    #[default]
    Propagate,
    /// Retry recoverable failures, `attempts` runs in total.
    Retry { attempts: u32 },
    /// Return the failure to the parent algebra as a value.
    Recover,
}

impl FailurePolicy {
    /// Total number of runs this policy allows (at least one).
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Retry { attempts } => (*attempts).max(1),
            Self::Propagate | Self::Recover => 1,
        }
    }

    /// Returns `true` if failures are handed back as values.
    #[must_use]
    pub fn recovers(&self) -> bool {
        matches!(self, Self::Recover)
    }
}

/// Result of a supervised child program that did not fail the parent.
#[derive(Debug)]
pub enum ChildOutcome<T> {
    /// The child ran to completion.
    Completed(T),
    /// The child failed and the policy is `Recover`.
    Recovered(ExecutionError),
}

impl<T> ChildOutcome<T> {
    /// Returns `true` if the child failed and was recovered.
    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }

    /// Turns a recovered failure back into a step failure.
    ///
    /// # Errors
    ///
    /// Returns [`FailureCause::Child`] for `Recovered`.
    pub fn into_result(self) -> Result<T, FailureCause> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Recovered(err) => Err(err.into()),
        }
    }
}
