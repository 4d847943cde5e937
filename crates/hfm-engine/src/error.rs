//! Engine errors.
//!
//! All errors implement [`ErrorCode`] for unified handling.
//!
//! # Error Codes
//!
//! | Type / Variant | Code | Recoverable |
//! |----------------|------|-------------|
//! | [`ConstructionError::Empty`] | `CONSTRUCTION_EMPTY` | No |
//! | [`ConstructionError::Invalid`] | `CONSTRUCTION_INVALID` | No |
//! | [`ConstructionError::OutOfRange`] | `CONSTRUCTION_OUT_OF_RANGE` | No |
//! | [`InterpreterFailure::Unavailable`] | `INTERPRETER_UNAVAILABLE` | Yes |
//! | [`InterpreterFailure::Failed`] | `INTERPRETER_FAILED` | Yes |
//! | [`InterpreterFailure::Rejected`] | `INTERPRETER_REJECTED` | No |
//! | [`InterpreterFailure::Aborted`] | `INTERPRETER_ABORTED` | No |
//! | [`UnboundAlgebraError`] | `BINDING_UNBOUND_ALGEBRA` | No |
//! | [`FailureCause::Unbound`] | `EXECUTION_UNBOUND_ALGEBRA` | No |
//! | [`FailureCause::Interpreter`] | `EXECUTION_INTERPRETER_FAILED` | Inherited |
//! | [`FailureCause::Child`] | `EXECUTION_CHILD_FAILED` | Inherited |
//! | [`FailureCause::Cancelled`] | `EXECUTION_CANCELLED` | No |
//! | [`FailureCause::StepLimitExceeded`] | `EXECUTION_STEP_LIMIT` | No |
//! | [`FailureCause::NestingTooDeep`] | `EXECUTION_NESTING_TOO_DEEP` | No |
//!
//! # Propagation
//!
//! - `ConstructionError` is returned by smart constructors while a
//!   program is built and never reaches the engine.
//! - Every other failure halts the run: the failing step's continuation
//!   is never invoked, and the caller receives an [`ExecutionError`]
//!   naming the step that failed.
//! - A failure inside a child program becomes the parent step's failure
//!   ([`FailureCause::Child`]), keeping the child's own frame inside.

use crate::algebra::CommandInfo;
use hfm_types::{AlgebraId, ErrorCode, RunId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Invalid command payload, rejected before the command exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A required collection or string was empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A payload value failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// A numeric payload was outside its accepted range.
    #[error("{field} out of range: {value} not in {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ConstructionError {
    /// Creates an invalid-payload error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl ErrorCode for ConstructionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "CONSTRUCTION_EMPTY",
            Self::Invalid { .. } => "CONSTRUCTION_INVALID",
            Self::OutOfRange { .. } => "CONSTRUCTION_OUT_OF_RANGE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Domain failure reported by an interpreter for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum InterpreterFailure {
    /// A resource the interpreter needs is temporarily missing.
    ///
    /// **Recoverable** - a rebuilt program may succeed later.
    #[error("resource unavailable: {0}")]
    Unavailable(String),

    /// The operation was attempted and failed.
    ///
    /// **Recoverable** - transient I/O style failure.
    #[error("operation failed: {0}")]
    Failed(String),

    /// The interpreter refuses this command outright.
    ///
    /// **Not recoverable** - the same command will be refused again.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The interpreter was told to stop.
    #[error("interpreter aborted")]
    Aborted,
}

impl InterpreterFailure {
    /// Creates an [`Unavailable`](Self::Unavailable) failure.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Creates a [`Failed`](Self::Failed) failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Creates a [`Rejected`](Self::Rejected) failure.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

impl ErrorCode for InterpreterFailure {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "INTERPRETER_UNAVAILABLE",
            Self::Failed(_) => "INTERPRETER_FAILED",
            Self::Rejected(_) => "INTERPRETER_REJECTED",
            Self::Aborted => "INTERPRETER_ABORTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Failed(_))
    }
}

/// No interpreter registered for an algebra (and selector).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no interpreter bound for {algebra}{}", selector_suffix(.selector))]
pub struct UnboundAlgebraError {
    /// The algebra that had no binding.
    pub algebra: AlgebraId,
    /// The selector that was looked up; `None` is the default binding.
    pub selector: Option<String>,
}

fn selector_suffix(selector: &Option<String>) -> String {
    selector
        .as_deref()
        .map(|s| format!(" (selector '{s}')"))
        .unwrap_or_default()
}

impl ErrorCode for UnboundAlgebraError {
    fn code(&self) -> &'static str {
        "BINDING_UNBOUND_ALGEBRA"
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Why a step failed.
///
/// This is also the error type of [`Algebra::dispatch`](crate::Algebra::dispatch):
/// interpreter failures and child failures convert into it with `?`.
#[derive(Debug, Error)]
pub enum FailureCause {
    /// The step's algebra had no interpreter bound.
    #[error(transparent)]
    Unbound(#[from] UnboundAlgebraError),

    /// The interpreter reported a failure.
    #[error(transparent)]
    Interpreter(#[from] InterpreterFailure),

    /// An embedded child program failed.
    #[error("child program failed: {0}")]
    Child(Box<ExecutionError>),

    /// The run was cancelled before this step.
    #[error("execution cancelled")]
    Cancelled,

    /// The program level exceeded its step budget.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: usize },

    /// A child program would exceed the nesting bound.
    #[error("nesting depth limit of {limit} exceeded")]
    NestingTooDeep { limit: usize },
}

impl From<ExecutionError> for FailureCause {
    fn from(err: ExecutionError) -> Self {
        Self::Child(Box::new(err))
    }
}

impl ErrorCode for FailureCause {
    fn code(&self) -> &'static str {
        match self {
            Self::Unbound(_) => "EXECUTION_UNBOUND_ALGEBRA",
            Self::Interpreter(_) => "EXECUTION_INTERPRETER_FAILED",
            Self::Child(_) => "EXECUTION_CHILD_FAILED",
            Self::Cancelled => "EXECUTION_CANCELLED",
            Self::StepLimitExceeded { .. } => "EXECUTION_STEP_LIMIT",
            Self::NestingTooDeep { .. } => "EXECUTION_NESTING_TOO_DEEP",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Interpreter(failure) => failure.is_recoverable(),
            Self::Child(err) => err.is_recoverable(),
            Self::Unbound(_)
            | Self::Cancelled
            | Self::StepLimitExceeded { .. }
            | Self::NestingTooDeep { .. } => false,
        }
    }
}

/// Position of one dispatched command.
///
/// `index` counts steps from 0 within one program level; `depth` is 0 for
/// the program handed to the engine and grows by one per child program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFrame {
    /// Run the step belongs to.
    pub run: RunId,
    /// Nesting depth.
    pub depth: usize,
    /// Step index within its program level.
    pub index: usize,
    /// The command at this step.
    pub command: CommandInfo,
}

impl fmt::Display for StepFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} at depth {} ({})",
            self.index, self.depth, self.command
        )
    }
}

/// Failure surfaced to the caller of [`Engine::execute`](crate::Engine::execute).
#[derive(Debug, Error)]
#[error("{frame}: {cause}")]
pub struct ExecutionError {
    frame: StepFrame,
    cause: FailureCause,
}

impl ExecutionError {
    /// Creates an error for the step at `frame`.
    #[must_use]
    pub fn new(frame: StepFrame, cause: FailureCause) -> Self {
        Self { frame, cause }
    }

    /// The step that failed at this level.
    #[must_use]
    pub fn frame(&self) -> &StepFrame {
        &self.frame
    }

    /// The failing command at this level.
    #[must_use]
    pub fn command(&self) -> &CommandInfo {
        &self.frame.command
    }

    /// Why the step failed.
    #[must_use]
    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }

    /// Consumes the error, returning the cause.
    #[must_use]
    pub fn into_cause(self) -> FailureCause {
        self.cause
    }

    /// Frames from this level down to the innermost failing step.
    #[must_use]
    pub fn path(&self) -> Vec<&StepFrame> {
        let mut path = vec![&self.frame];
        let mut current = self;
        while let FailureCause::Child(child) = &current.cause {
            path.push(&child.frame);
            current = child;
        }
        path
    }

    /// The innermost error in a chain of child failures.
    #[must_use]
    pub fn innermost(&self) -> &ExecutionError {
        let mut current = self;
        while let FailureCause::Child(child) = &current.cause {
            current = child;
        }
        current
    }

    /// The cause reported by the innermost failing step.
    #[must_use]
    pub fn root_cause(&self) -> &FailureCause {
        &self.innermost().cause
    }

    /// Returns `true` if the run was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root_cause(), FailureCause::Cancelled)
    }
}

impl ErrorCode for ExecutionError {
    fn code(&self) -> &'static str {
        self.cause.code()
    }

    fn is_recoverable(&self) -> bool {
        self.cause.is_recoverable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfm_types::assert_error_codes;

    fn frame(depth: usize, index: usize, name: &'static str) -> StepFrame {
        StepFrame {
            run: RunId::new(),
            depth,
            index,
            command: CommandInfo::new(AlgebraId::new("test"), name),
        }
    }

    fn all_causes() -> Vec<FailureCause> {
        vec![
            FailureCause::Unbound(UnboundAlgebraError {
                algebra: AlgebraId::new("test"),
                selector: None,
            }),
            FailureCause::Interpreter(InterpreterFailure::failed("x")),
            FailureCause::Child(Box::new(ExecutionError::new(
                frame(1, 0, "Inner"),
                FailureCause::Cancelled,
            ))),
            FailureCause::Cancelled,
            FailureCause::StepLimitExceeded { limit: 1 },
            FailureCause::NestingTooDeep { limit: 1 },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_causes(), "EXECUTION_");
        assert_error_codes(
            &[
                InterpreterFailure::unavailable("x"),
                InterpreterFailure::failed("x"),
                InterpreterFailure::rejected("x"),
                InterpreterFailure::Aborted,
            ],
            "INTERPRETER_",
        );
        assert_error_codes(
            &[
                ConstructionError::Empty { field: "x" },
                ConstructionError::invalid("x", "y"),
                ConstructionError::OutOfRange {
                    field: "x",
                    value: 0,
                    min: 1,
                    max: 2,
                },
            ],
            "CONSTRUCTION_",
        );
    }

    #[test]
    fn interpreter_recoverability() {
        assert!(InterpreterFailure::unavailable("oven").is_recoverable());
        assert!(InterpreterFailure::failed("io").is_recoverable());
        assert!(!InterpreterFailure::rejected("bad").is_recoverable());
        assert!(!InterpreterFailure::Aborted.is_recoverable());
    }

    #[test]
    fn child_recoverability_is_inherited() {
        let inner = ExecutionError::new(
            frame(1, 2, "Bake"),
            InterpreterFailure::unavailable("oven").into(),
        );
        let outer = ExecutionError::new(frame(0, 0, "MakePizza"), inner.into());
        assert!(outer.is_recoverable());
        assert_eq!(outer.code(), "EXECUTION_CHILD_FAILED");
    }

    #[test]
    fn path_and_root_cause() {
        let inner = ExecutionError::new(
            frame(1, 2, "Bake"),
            InterpreterFailure::rejected("burnt").into(),
        );
        let outer = ExecutionError::new(frame(0, 1, "MakePizza"), inner.into());

        let path: Vec<_> = outer.path().iter().map(|f| f.command.name).collect();
        assert_eq!(path, vec!["MakePizza", "Bake"]);
        assert_eq!(outer.innermost().frame().index, 2);
        assert!(matches!(
            outer.root_cause(),
            FailureCause::Interpreter(InterpreterFailure::Rejected(_))
        ));
        assert!(!outer.is_cancelled());
    }

    #[test]
    fn unbound_display_includes_selector() {
        let err = UnboundAlgebraError {
            algebra: AlgebraId::new("pizza"),
            selector: Some("luigi".into()),
        };
        assert_eq!(
            err.to_string(),
            "no interpreter bound for algebra:pizza (selector 'luigi')"
        );
        assert_eq!(err.code(), "BINDING_UNBOUND_ALGEBRA");
    }

    #[test]
    fn execution_error_display() {
        let err = ExecutionError::new(frame(0, 1, "Ring"), FailureCause::Cancelled);
        assert_eq!(
            err.to_string(),
            "step 1 at depth 0 (test::Ring): execution cancelled"
        );
    }
}
