//! Hierarchical effect-interpretation engine.
//!
//! Programs are built from the commands of a closed *algebra* and are
//! pure data until an [`Engine`] runs them against interpreters taken
//! from an [`InterpreterRegistry`]. A command of one algebra may embed a
//! complete program of another; the engine runs that child program with
//! the child algebra's own interpreter.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Foundation Layer                          │
//! │  hfm-types   : AlgebraId, RunId, ErrorCode, TryNew          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Engine Layer                  ◄── HERE   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  algebra     : Algebra trait, CommandInfo                   │
//! │  program     : Program (Done / Step), bind, map             │
//! │  registry    : InterpreterRegistry (substitution point)     │
//! │  engine      : Engine (trampoline)                          │
//! │  context     : StepContext (child programs)                 │
//! │  policy      : FailurePolicy, ChildOutcome                  │
//! │  config      : HfmConfig, ConfigLoader                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use hfm_engine::testing::{Probe, RecordingObserver, ScriptedProbe};
//! use hfm_engine::{Engine, InterpreterRegistry};
//! use std::sync::Arc;
//!
//! // Build: nothing runs yet.
//! let program = Probe::emit(1)
//!     .bind(|a| Probe::emit(a * 2))
//!     .map(|b| format!("got {b}"));
//!
//! // Interpret against a registry; swapping the registry swaps behaviour.
//! let registry = InterpreterRegistry::new()
//!     .with::<Probe>(Arc::new(ScriptedProbe::new().with_offset(1)));
//! let observer = Arc::new(RecordingObserver::new());
//!
//! let result = Engine::new()
//!     .with_observer(observer.clone())
//!     .execute(program, &registry)?;
//!
//! assert_eq!(result, "got 5");
//! assert_eq!(observer.details(), vec!["1", "4"]);
//! # Ok::<(), hfm_engine::ExecutionError>(())
//! ```
//!
//! # Error Handling
//!
//! Every error type implements [`hfm_types::ErrorCode`]. A failing run
//! returns [`ExecutionError`], which names the failing step and, for
//! child failures, chains down to the innermost step
//! ([`ExecutionError::path`], [`ExecutionError::root_cause`]).

mod algebra;
mod call_log;
pub mod config;
mod context;
mod continuation;
mod engine;
mod error;
mod observer;
mod policy;
mod program;
mod registry;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use algebra::{Algebra, CommandInfo};
pub use call_log::CallLog;
pub use context::StepContext;
pub use continuation::Continuation;
pub use engine::Engine;
pub use error::{
    ConstructionError, ExecutionError, FailureCause, InterpreterFailure, StepFrame,
    UnboundAlgebraError,
};
pub use observer::{CancelToken, ExecutionObserver};
pub use policy::{ChildOutcome, FailurePolicy};
pub use program::Program;
pub use registry::InterpreterRegistry;
