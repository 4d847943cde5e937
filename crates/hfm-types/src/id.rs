//! Identifier types for HFM.

use serde::Serialize;
use uuid::{uuid, Uuid};

/// HFM namespace UUID for deterministic UUID v5 generation.
const HFM_NAMESPACE: Uuid = uuid!("6f1c2a8e-3b7d-4c59-9e0a-52d4b8f7a913");

/// Identity of a Command Algebra.
///
/// The UUID is derived from the algebra name (UUID v5), so the same
/// algebra has the same identity in every process. Names are
/// `&'static str` because they come from an algebra's `NAME` constant.
///
/// # Example
///
/// ```
/// use hfm_types::AlgebraId;
///
/// let a = AlgebraId::new("sandwich");
/// let b = AlgebraId::new("sandwich");
/// assert_eq!(a, b);
/// assert_eq!(a.name(), "sandwich");
/// assert_ne!(a, AlgebraId::new("pizza"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AlgebraId {
    uuid: Uuid,
    name: &'static str,
}

impl AlgebraId {
    /// Creates the identity for the algebra called `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            uuid: Uuid::new_v5(&HFM_NAMESPACE, name.as_bytes()),
            name,
        }
    }

    /// Returns the algebra name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the deterministic UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl std::fmt::Display for AlgebraId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "algebra:{}", self.name)
    }
}

/// Identifier for one `execute` call, shared by every nested child run.
///
/// Used to correlate log lines, observer records and errors.
///
/// # Example
///
/// ```
/// use hfm_types::RunId;
///
/// let a = RunId::new();
/// let b = RunId::new();
/// assert_ne!(a, b);
/// assert!(a.to_string().starts_with("run:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a new random run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run:{}", self.0)
    }
}
