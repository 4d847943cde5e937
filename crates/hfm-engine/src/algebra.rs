//! Command Algebra framework.
//!
//! An algebra is the closed set of operations of one subsystem. It is
//! described by a type implementing [`Algebra`]:
//!
//! | Item | Meaning |
//! |------|---------|
//! | `NAME` | Stable algebra name (logs, errors, policy keys) |
//! | `Interpreter` | Capability trait object, one method per operation |
//! | `Command<Next>` | The variants; each holds payload + a [`Continuation`](crate::Continuation) into `Next` |
//! | `map` | Post-composes every variant's continuation |
//! | `describe` | Command identity and rendered payload |
//! | `dispatch` | Runs one command against the bound interpreter |
//!
//! `dispatch` is a single exhaustive `match`: adding a variant without
//! handling it does not compile, and adding an interpreter method
//! forces every interpreter to implement it.
//!
//! # Example
//!
//! ```
//! use hfm_engine::{Algebra, CommandInfo, Continuation, FailureCause, InterpreterFailure, StepContext};
//!
//! pub trait BellInterpreter: Send + Sync {
//!     fn ring(&self, times: u32) -> Result<u32, InterpreterFailure>;
//! }
//!
//! pub enum BellCommand<Next> {
//!     Ring { times: u32, next: Continuation<u32, Next> },
//! }
//!
//! pub struct Bell;
//!
//! impl Algebra for Bell {
//!     const NAME: &'static str = "bell";
//!     type Interpreter = dyn BellInterpreter;
//!     type Command<Next: 'static> = BellCommand<Next>;
//!
//!     fn map<N: 'static, M: 'static>(
//!         command: BellCommand<N>,
//!         f: impl FnOnce(N) -> M + Send + 'static,
//!     ) -> BellCommand<M> {
//!         match command {
//!             BellCommand::Ring { times, next } => BellCommand::Ring { times, next: next.then(f) },
//!         }
//!     }
//!
//!     fn describe<N: 'static>(command: &BellCommand<N>) -> CommandInfo {
//!         match command {
//!             BellCommand::Ring { times, .. } => CommandInfo::of::<Self>("Ring").with_detail(times.to_string()),
//!         }
//!     }
//!
//!     fn dispatch<N: 'static>(command: BellCommand<N>, cx: &StepContext<'_, Self>) -> Result<N, FailureCause> {
//!         match command {
//!             BellCommand::Ring { times, next } => Ok(next.resume(cx.interpreter().ring(times)?)),
//!         }
//!     }
//! }
//! ```

use crate::context::StepContext;
use crate::error::FailureCause;
use hfm_types::AlgebraId;
use serde::Serialize;
use std::fmt;

/// A closed command language for one subsystem.
///
/// See the [module docs](self) for the role of each item.
pub trait Algebra: Sized + 'static {
    /// Stable algebra name, also the key for per-algebra failure policies.
    const NAME: &'static str;

    /// Capability set an interpreter must provide, usually `dyn SomeTrait`.
    type Interpreter: ?Sized + Send + Sync + 'static;

    /// Operation variants with a continuation into `Next`.
    type Command<Next: 'static>: Send;

    /// Returns the algebra identity.
    fn id() -> AlgebraId {
        AlgebraId::new(Self::NAME)
    }

    /// Post-composes `f` onto the continuation of `command`.
    fn map<N: 'static, M: 'static>(
        command: Self::Command<N>,
        f: impl FnOnce(N) -> M + Send + 'static,
    ) -> Self::Command<M>;

    /// Describes `command` without consuming it.
    fn describe<N: 'static>(command: &Self::Command<N>) -> CommandInfo;

    /// Executes `command` and resumes its continuation with the result.
    ///
    /// # Errors
    ///
    /// Returns the interpreter's failure (or a child program's failure)
    /// without invoking the continuation.
    fn dispatch<N: 'static>(
        command: Self::Command<N>,
        cx: &StepContext<'_, Self>,
    ) -> Result<N, FailureCause>;
}

/// Identity and payload summary of one command.
///
/// Equality covers algebra, name and detail, so two runs that dispatch
/// the same commands produce equal `CommandInfo` sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    /// Owning algebra.
    pub algebra: AlgebraId,
    /// Variant name, e.g. `"AddComponent"`.
    pub name: &'static str,
    /// Rendered payload; empty when the command carries none.
    pub detail: String,
}

impl CommandInfo {
    /// Creates a descriptor with no payload detail.
    #[must_use]
    pub fn new(algebra: AlgebraId, name: &'static str) -> Self {
        Self {
            algebra,
            name,
            detail: String::new(),
        }
    }

    /// Creates a descriptor for a command of algebra `A`.
    #[must_use]
    pub fn of<A: Algebra>(name: &'static str) -> Self {
        Self::new(A::id(), name)
    }

    /// Attaches a rendered payload.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Returns `algebra::Name`, without the detail.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.algebra.name(), self.name)
    }
}

impl fmt::Display for CommandInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}::{}", self.algebra.name(), self.name)
        } else {
            write!(f, "{}::{}({})", self.algebra.name(), self.name, self.detail)
        }
    }
}
