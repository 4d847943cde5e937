//! Execution engine.
//!
//! The [`Engine`] drives a [`Program`] to completion against the
//! interpreters of an [`InterpreterRegistry`].
//!
//! # Runtime Loop
//!
//! ```text
//! loop {
//!     Done(value)  → apply the next pending bound function,
//!                    or return value when none is left
//!     Step(cmd, k) → push k onto pending, then
//!         1. cancellation / step budget check
//!         2. resolve interpreter (first step of this level only)
//!         3. notify observers
//!         4. Algebra::dispatch → interpreter → continuation
//!         5. continue with the next node
//! }
//! ```
//!
//! The loop is a trampoline: one iteration per step or bound function,
//! so neither program length nor the way binds are grouped grows the
//! call stack. Child programs embedded in a command run
//! through the same loop one level deeper.
//!
//! # Failure
//!
//! Any failure ends the run at that step. The continuation of the failing
//! step is dropped unused and later commands are never dispatched.

use crate::algebra::Algebra;
use crate::config::{EngineSettings, HfmConfig};
use crate::context::StepContext;
use crate::error::{ExecutionError, FailureCause, StepFrame};
use crate::observer::{CancelToken, ExecutionObserver};
use crate::policy::FailurePolicy;
use crate::program::{unerase, Bound, Node, Program};
use crate::registry::InterpreterRegistry;
use hfm_types::{AlgebraId, RunId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Drives programs against an interpreter registry.
///
/// An engine holds no interpreter and no program state; the same engine
/// can run any number of programs, concurrently, against different
/// registries.
///
/// # Example
///
/// ```
/// use hfm_engine::testing::{Probe, ScriptedProbe};
/// use hfm_engine::{Engine, InterpreterRegistry};
/// use std::sync::Arc;
///
/// let program = Probe::emit(1).bind(|a| Probe::emit(a + 1));
/// let registry = InterpreterRegistry::new().with::<Probe>(Arc::new(ScriptedProbe::new()));
///
/// let value = Engine::new().execute(program, &registry)?;
/// assert_eq!(value, 2);
/// # Ok::<(), hfm_engine::ExecutionError>(())
/// ```
#[derive(Clone, Default)]
pub struct Engine {
    settings: EngineSettings,
    policies: BTreeMap<String, FailurePolicy>,
    observers: Vec<Arc<dyn ExecutionObserver>>,
    cancel: CancelToken,
}

impl Engine {
    /// Creates an engine with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine from loaded configuration.
    #[must_use]
    pub fn from_config(config: &HfmConfig) -> Self {
        Self {
            settings: config.engine.clone(),
            policies: config.policies.clone(),
            ..Self::default()
        }
    }

    /// Replaces the engine settings.
    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the failure policy for supervised children of algebra `A`.
    #[must_use]
    pub fn with_policy<A: Algebra>(mut self, policy: FailurePolicy) -> Self {
        self.policies.insert(A::NAME.to_string(), policy);
        self
    }

    /// Adds an observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Uses `token` for cancellation.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a handle that cancels runs of this engine.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the engine settings.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the failure policy configured for `algebra`.
    #[must_use]
    pub fn policy_for(&self, algebra: AlgebraId) -> FailurePolicy {
        self.policies
            .get(algebra.name())
            .copied()
            .unwrap_or_default()
    }

    /// Runs `program` with the default binding for `A`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] identifying the failing step when an
    /// interpreter fails, an algebra is unbound, a child program fails,
    /// the run is cancelled, or a limit is exceeded.
    pub fn execute<A: Algebra, T: Send + 'static>(
        &self,
        program: Program<A, T>,
        registry: &InterpreterRegistry,
    ) -> Result<T, ExecutionError> {
        self.run_root(program, registry, None)
    }

    /// Runs `program` with the interpreter bound for `A` under `selector`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn execute_as<A: Algebra, T: Send + 'static>(
        &self,
        selector: &str,
        program: Program<A, T>,
        registry: &InterpreterRegistry,
    ) -> Result<T, ExecutionError> {
        self.run_root(program, registry, Some(selector))
    }

    fn run_root<A: Algebra, T: Send + 'static>(
        &self,
        program: Program<A, T>,
        registry: &InterpreterRegistry,
        selector: Option<&str>,
    ) -> Result<T, ExecutionError> {
        let run = RunId::new();
        let _span = tracing::debug_span!("hfm_run", run = %run, algebra = A::NAME).entered();
        debug!(selector = ?selector, "run started");

        let mut steps = 0;
        let result = self.drive(program, registry, selector, run, 0, &mut steps);

        match &result {
            Ok(_) => {
                debug!(steps, "run completed");
                for observer in &self.observers {
                    observer.on_complete(run, steps);
                }
            }
            Err(err) => {
                warn!(code = %hfm_types::ErrorCode::code(err), error = %err, "run failed");
                for observer in &self.observers {
                    observer.on_failure(err);
                }
            }
        }

        result
    }

    /// Trampoline over one program level.
    ///
    /// Functions bound after a step wait on `pending` until the step's
    /// value is ready, so binding depth never reaches the call stack.
    /// `steps` receives the number of commands dispatched at this level.
    pub(crate) fn drive<A: Algebra, T: Send + 'static>(
        &self,
        program: Program<A, T>,
        registry: &InterpreterRegistry,
        selector: Option<&str>,
        run: RunId,
        depth: usize,
        steps: &mut usize,
    ) -> Result<T, ExecutionError> {
        let mut current = program.into_node();
        let mut pending: Vec<Bound<A>> = Vec::new();
        let mut interpreter: Option<Arc<A::Interpreter>> = None;
        let mut index = 0;

        loop {
            let command = match current {
                Node::Done(value) => match pending.pop() {
                    Some(next) => {
                        current = next(value);
                        continue;
                    }
                    None => {
                        *steps = index;
                        return Ok(unerase(value));
                    }
                },
                Node::Step(command, bound) => {
                    pending.extend(bound.into_iter().rev());
                    command
                }
            };

            let frame = StepFrame {
                run,
                depth,
                index,
                command: A::describe::<Node<A>>(&command),
            };

            if self.cancel.is_cancelled() {
                return Err(ExecutionError::new(frame, FailureCause::Cancelled));
            }

            let limit = self.settings.max_steps;
            if limit > 0 && index >= limit {
                return Err(ExecutionError::new(
                    frame,
                    FailureCause::StepLimitExceeded { limit },
                ));
            }

            let bound = match interpreter.as_ref() {
                Some(bound) => Arc::clone(bound),
                None => match registry.resolve::<A>(selector) {
                    Ok(resolved) => {
                        interpreter = Some(Arc::clone(&resolved));
                        resolved
                    }
                    Err(unbound) => return Err(ExecutionError::new(frame, unbound.into())),
                },
            };

            if self.settings.trace_commands {
                trace!(depth, index, command = %frame.command, "dispatch");
            }
            for observer in &self.observers {
                observer.on_dispatch(&frame);
            }

            let cx = StepContext::new(self, registry, &*bound, &frame);
            match A::dispatch::<Node<A>>(*command, &cx) {
                Ok(next) => {
                    current = next;
                    index += 1;
                }
                Err(cause) => {
                    debug!(depth, index, command = %frame.command, cause = %cause, "step failed");
                    return Err(ExecutionError::new(frame, cause));
                }
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("policies", &self.policies)
            .field("observers", &self.observers.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
