//! Hierarchical composition.
//!
//! [`StepContext`] is what [`Algebra::dispatch`](crate::Algebra::dispatch)
//! receives for one step. Besides the interpreter bound for the current
//! algebra, it lets a command run an embedded child program over another
//! algebra.
//!
//! ```text
//! CookingMachine step (depth 0)
//!   └─ run_child(Program<Sandwich, _>)      depth 1, sandwich binding
//!        ├─ StartNewSandwich
//!        ├─ AddComponent(Cheese)
//!        └─ FinishSandwich
//!   ← child value resumes the parent continuation
//! ```
//!
//! A child runs to completion through the same engine with its own
//! binding. Its failure becomes the parent step's failure
//! ([`FailureCause::Child`]); child commands are never seen by the parent
//! interpreter.

use crate::algebra::Algebra;
use crate::engine::Engine;
use crate::error::{FailureCause, StepFrame};
use crate::policy::ChildOutcome;
use crate::program::Program;
use crate::registry::InterpreterRegistry;
use hfm_types::ErrorCode;
use tracing::{debug, warn};

/// Per-step view handed to [`Algebra::dispatch`](crate::Algebra::dispatch).
pub struct StepContext<'e, A: Algebra> {
    engine: &'e Engine,
    registry: &'e InterpreterRegistry,
    interpreter: &'e A::Interpreter,
    frame: &'e StepFrame,
}

impl<'e, A: Algebra> StepContext<'e, A> {
    pub(crate) fn new(
        engine: &'e Engine,
        registry: &'e InterpreterRegistry,
        interpreter: &'e A::Interpreter,
        frame: &'e StepFrame,
    ) -> Self {
        Self {
            engine,
            registry,
            interpreter,
            frame,
        }
    }

    /// The interpreter bound for `A` in this run.
    #[must_use]
    pub fn interpreter(&self) -> &'e A::Interpreter {
        self.interpreter
    }

    /// Position of the current step.
    #[must_use]
    pub fn frame(&self) -> &StepFrame {
        self.frame
    }

    /// Nesting depth of the current step.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    /// Runs `program` to completion with the default binding for `B`.
    ///
    /// # Errors
    ///
    /// [`FailureCause::Child`] if the child fails, or
    /// [`FailureCause::NestingTooDeep`] if the child would exceed the
    /// configured nesting depth.
    pub fn run_child<B: Algebra, T: Send + 'static>(
        &self,
        program: Program<B, T>,
    ) -> Result<T, FailureCause> {
        self.child(program, None)
    }

    /// Runs `program` to completion with the binding for `B` under `selector`.
    ///
    /// # Errors
    ///
    /// Same as [`run_child`](Self::run_child); an unbound selector fails
    /// the child's first step.
    pub fn run_child_as<B: Algebra, T: Send + 'static>(
        &self,
        selector: &str,
        program: Program<B, T>,
    ) -> Result<T, FailureCause> {
        self.child(program, Some(selector))
    }

    /// Runs a child built by `recipe` under the failure policy for `B`.
    ///
    /// `recipe` is called again for every retry. Cancellation and the
    /// nesting bound are never retried or recovered.
    ///
    /// # Errors
    ///
    /// Returns the child failure unless the policy retried it away or
    /// recovered it.
    pub fn supervise_child<B: Algebra, T: Send + 'static, F>(
        &self,
        selector: Option<&str>,
        mut recipe: F,
    ) -> Result<ChildOutcome<T>, FailureCause>
    where
        F: FnMut() -> Program<B, T>,
    {
        let policy = self.engine.policy_for(B::id());
        let attempts = policy.max_attempts();
        let mut attempt = 1;

        loop {
            let err = match self.child(recipe(), selector) {
                Ok(value) => return Ok(ChildOutcome::Completed(value)),
                Err(FailureCause::Child(err)) if !err.is_cancelled() => err,
                Err(other) => return Err(other),
            };

            if attempt < attempts && err.is_recoverable() {
                warn!(
                    algebra = B::NAME,
                    attempt,
                    attempts,
                    code = err.code(),
                    error = %err,
                    "child failed, retrying"
                );
                attempt += 1;
                continue;
            }

            if policy.recovers() {
                debug!(algebra = B::NAME, code = err.code(), "child failure recovered");
                return Ok(ChildOutcome::Recovered(*err));
            }

            return Err(FailureCause::Child(err));
        }
    }

    /// Runs two independent child programs in parallel.
    ///
    /// Both run to completion with their default bindings. If both fail,
    /// the failure of `left` is reported.
    ///
    /// # Errors
    ///
    /// The first failure, as with [`run_child`](Self::run_child).
    pub fn join_children<B1, T1, B2, T2>(
        &self,
        left: Program<B1, T1>,
        right: Program<B2, T2>,
    ) -> Result<(T1, T2), FailureCause>
    where
        B1: Algebra,
        B2: Algebra,
        T1: Send + 'static,
        T2: Send + 'static,
    {
        let (left, right) = rayon::join(|| self.child(left, None), || self.child(right, None));
        Ok((left?, right?))
    }

    fn child<B: Algebra, T: Send + 'static>(
        &self,
        program: Program<B, T>,
        selector: Option<&str>,
    ) -> Result<T, FailureCause> {
        let depth = self.frame.depth + 1;
        let limit = self.engine.settings().max_depth;
        if depth > limit {
            return Err(FailureCause::NestingTooDeep { limit });
        }

        debug!(parent = A::NAME, child = B::NAME, depth, "entering child program");
        let mut steps = 0;
        self.engine
            .drive(program, self.registry, selector, self.frame.run, depth, &mut steps)
            .map_err(FailureCause::from)
    }
}

impl<A: Algebra> std::fmt::Debug for StepContext<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepContext")
            .field("algebra", &A::NAME)
            .field("frame", self.frame)
            .finish_non_exhaustive()
    }
}
