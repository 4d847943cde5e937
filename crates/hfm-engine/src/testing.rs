//! Test utilities for programs, interpreters and observers.
//!
//! Available under `#[cfg(test)]` and the `test-utils` feature.
//!
//! - [`Probe`]: a one-operation algebra (`Emit(i64) -> i64`) for exercising
//!   the engine without a real domain.
//! - [`ScriptedProbe`]: a `Probe` interpreter with a fixed offset and
//!   scripted failures.
//! - [`RecordingObserver`]: records every dispatched frame.
//! - [`CallLog`]: re-exported from the crate root for mock interpreters.

use crate::algebra::{Algebra, CommandInfo};
use crate::context::StepContext;
use crate::continuation::Continuation;
use crate::error::{ExecutionError, FailureCause, InterpreterFailure, StepFrame};
use crate::observer::ExecutionObserver;
use crate::program::Program;
use hfm_types::{ErrorCode, RunId};
use parking_lot::Mutex;
use std::collections::HashMap;

pub use crate::call_log::CallLog;

/// Capability set of the [`Probe`] algebra.
pub trait ProbeInterpreter: Send + Sync {
    /// Handles `Emit(value)`.
    fn emit(&self, value: i64) -> Result<i64, InterpreterFailure>;
}

/// Commands of the [`Probe`] algebra.
pub enum ProbeCommand<Next> {
    /// Emits a value; the interpreter answers with another value.
    Emit {
        value: i64,
        next: Continuation<i64, Next>,
    },
}

/// Minimal algebra used by engine tests.
#[derive(Debug)]
pub struct Probe;

impl Probe {
    /// One-step program emitting `value`.
    pub fn emit(value: i64) -> Program<Probe, i64> {
        Program::lift(ProbeCommand::Emit {
            value,
            next: Continuation::identity(),
        })
    }
}

impl Algebra for Probe {
    const NAME: &'static str = "probe";
    type Interpreter = dyn ProbeInterpreter;
    type Command<Next: 'static> = ProbeCommand<Next>;

    fn map<N: 'static, M: 'static>(
        command: ProbeCommand<N>,
        f: impl FnOnce(N) -> M + Send + 'static,
    ) -> ProbeCommand<M> {
        match command {
            ProbeCommand::Emit { value, next } => ProbeCommand::Emit {
                value,
                next: next.then(f),
            },
        }
    }

    fn describe<N: 'static>(command: &ProbeCommand<N>) -> CommandInfo {
        match command {
            ProbeCommand::Emit { value, .. } => {
                CommandInfo::of::<Self>("Emit").with_detail(value.to_string())
            }
        }
    }

    fn dispatch<N: 'static>(
        command: ProbeCommand<N>,
        cx: &StepContext<'_, Self>,
    ) -> Result<N, FailureCause> {
        match command {
            ProbeCommand::Emit { value, next } => Ok(next.resume(cx.interpreter().emit(value)?)),
        }
    }
}

struct ScriptedFailure {
    failure: InterpreterFailure,
    /// `None` fails forever.
    remaining: Option<u32>,
}

/// [`ProbeInterpreter`] answering `value + offset`, with scripted failures.
///
/// # Example
///
/// ```
/// use hfm_engine::testing::{ProbeInterpreter, ScriptedProbe};
/// use hfm_engine::InterpreterFailure;
///
/// let probe = ScriptedProbe::new()
///     .with_offset(1)
///     .fail_on(3, InterpreterFailure::rejected("three"));
///
/// assert_eq!(probe.emit(1), Ok(2));
/// assert!(probe.emit(3).is_err());
/// assert_eq!(probe.log().entries(), vec!["emit(1)", "emit(3)"]);
/// ```
#[derive(Default)]
pub struct ScriptedProbe {
    offset: i64,
    failures: Mutex<HashMap<i64, ScriptedFailure>>,
    log: CallLog,
}

impl ScriptedProbe {
    /// Creates a probe that echoes values unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `offset` to every answer.
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Fails every `emit(value)` with `failure`.
    #[must_use]
    pub fn fail_on(self, value: i64, failure: InterpreterFailure) -> Self {
        self.failures.lock().insert(
            value,
            ScriptedFailure {
                failure,
                remaining: None,
            },
        );
        self
    }

    /// Fails the first `times` calls of `emit(value)` with `failure`.
    #[must_use]
    pub fn fail_times(self, value: i64, times: u32, failure: InterpreterFailure) -> Self {
        self.failures.lock().insert(
            value,
            ScriptedFailure {
                failure,
                remaining: Some(times),
            },
        );
        self
    }

    /// Handle to the call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl ProbeInterpreter for ScriptedProbe {
    fn emit(&self, value: i64) -> Result<i64, InterpreterFailure> {
        self.log.record(format!("emit({value})"));

        let mut failures = self.failures.lock();
        if let Some(scripted) = failures.get_mut(&value) {
            match scripted.remaining.as_mut() {
                None => return Err(scripted.failure.clone()),
                Some(0) => {}
                Some(remaining) => {
                    *remaining -= 1;
                    return Err(scripted.failure.clone());
                }
            }
        }

        Ok(value + self.offset)
    }
}

/// Observer that keeps everything it sees.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    frames: Mutex<Vec<StepFrame>>,
    completions: Mutex<Vec<(RunId, usize)>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All dispatched frames, in dispatch order.
    #[must_use]
    pub fn frames(&self) -> Vec<StepFrame> {
        self.frames.lock().clone()
    }

    /// Dispatched commands, in dispatch order.
    #[must_use]
    pub fn commands(&self) -> Vec<CommandInfo> {
        self.frames.lock().iter().map(|f| f.command.clone()).collect()
    }

    /// Dispatched commands rendered as `algebra::Name(detail)`.
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.frames
            .lock()
            .iter()
            .map(|f| f.command.to_string())
            .collect()
    }

    /// Payload details of dispatched commands.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        self.frames
            .lock()
            .iter()
            .map(|f| f.command.detail.clone())
            .collect()
    }

    /// Number of completed top-level runs.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.completions.lock().len()
    }

    /// Top-level step count of the last completed run.
    #[must_use]
    pub fn last_step_count(&self) -> Option<usize> {
        self.completions.lock().last().map(|(_, steps)| *steps)
    }

    /// Error codes of failed top-level runs.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }
}

impl ExecutionObserver for RecordingObserver {
    fn on_dispatch(&self, frame: &StepFrame) {
        self.frames.lock().push(frame.clone());
    }

    fn on_complete(&self, run: RunId, steps: usize) {
        self.completions.lock().push((run, steps));
    }

    fn on_failure(&self, error: &ExecutionError) {
        self.failures.lock().push(error.code().to_string());
    }
}
