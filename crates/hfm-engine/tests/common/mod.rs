//! Shared fixtures for engine integration tests.
//!
//! `Relay` is a parent algebra whose commands embed `Probe` programs.

#![allow(dead_code)]

use hfm_engine::testing::{CallLog, Probe, ProbeInterpreter};
use hfm_engine::{
    Algebra, CancelToken, ChildOutcome, CommandInfo, Continuation, FailureCause,
    InterpreterFailure, Program, StepContext,
};
use hfm_types::ErrorCode;

/// Sends engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("hfm_engine=trace")
        .with_test_writer()
        .try_init();
}

pub trait RelayInterpreter: Send + Sync {
    fn note(&self, text: &str) -> Result<(), InterpreterFailure>;
}

pub type Recipe = Box<dyn FnMut() -> Program<Probe, i64> + Send>;

pub enum RelayCommand<Next> {
    Note {
        text: String,
        next: Continuation<(), Next>,
    },
    Forward {
        program: Program<Probe, i64>,
        next: Continuation<i64, Next>,
    },
    ForwardAs {
        selector: String,
        program: Program<Probe, i64>,
        next: Continuation<i64, Next>,
    },
    Supervise {
        recipe: Recipe,
        next: Continuation<Result<i64, String>, Next>,
    },
    Pair {
        left: Program<Probe, i64>,
        right: Program<Probe, i64>,
        next: Continuation<(i64, i64), Next>,
    },
}

pub struct Relay;

impl Relay {
    pub fn note(text: &str) -> Program<Relay, ()> {
        Program::lift(RelayCommand::Note {
            text: text.to_string(),
            next: Continuation::identity(),
        })
    }

    pub fn forward(program: Program<Probe, i64>) -> Program<Relay, i64> {
        Program::lift(RelayCommand::Forward {
            program,
            next: Continuation::identity(),
        })
    }

    pub fn forward_as(selector: &str, program: Program<Probe, i64>) -> Program<Relay, i64> {
        Program::lift(RelayCommand::ForwardAs {
            selector: selector.to_string(),
            program,
            next: Continuation::identity(),
        })
    }

    /// Recovered failures come back as `Err(code)`.
    pub fn supervise(
        recipe: impl FnMut() -> Program<Probe, i64> + Send + 'static,
    ) -> Program<Relay, Result<i64, String>> {
        Program::lift(RelayCommand::Supervise {
            recipe: Box::new(recipe),
            next: Continuation::identity(),
        })
    }

    pub fn pair(left: Program<Probe, i64>, right: Program<Probe, i64>) -> Program<Relay, (i64, i64)> {
        Program::lift(RelayCommand::Pair {
            left,
            right,
            next: Continuation::identity(),
        })
    }
}

impl Algebra for Relay {
    const NAME: &'static str = "relay";
    type Interpreter = dyn RelayInterpreter;
    type Command<Next: 'static> = RelayCommand<Next>;

    fn map<N: 'static, M: 'static>(
        command: RelayCommand<N>,
        f: impl FnOnce(N) -> M + Send + 'static,
    ) -> RelayCommand<M> {
        match command {
            RelayCommand::Note { text, next } => RelayCommand::Note {
                text,
                next: next.then(f),
            },
            RelayCommand::Forward { program, next } => RelayCommand::Forward {
                program,
                next: next.then(f),
            },
            RelayCommand::ForwardAs {
                selector,
                program,
                next,
            } => RelayCommand::ForwardAs {
                selector,
                program,
                next: next.then(f),
            },
            RelayCommand::Supervise { recipe, next } => RelayCommand::Supervise {
                recipe,
                next: next.then(f),
            },
            RelayCommand::Pair { left, right, next } => RelayCommand::Pair {
                left,
                right,
                next: next.then(f),
            },
        }
    }

    fn describe<N: 'static>(command: &RelayCommand<N>) -> CommandInfo {
        match command {
            RelayCommand::Note { text, .. } => CommandInfo::of::<Self>("Note").with_detail(text.clone()),
            RelayCommand::Forward { .. } => CommandInfo::of::<Self>("Forward"),
            RelayCommand::ForwardAs { selector, .. } => {
                CommandInfo::of::<Self>("ForwardAs").with_detail(selector.clone())
            }
            RelayCommand::Supervise { .. } => CommandInfo::of::<Self>("Supervise"),
            RelayCommand::Pair { .. } => CommandInfo::of::<Self>("Pair"),
        }
    }

    fn dispatch<N: 'static>(
        command: RelayCommand<N>,
        cx: &StepContext<'_, Self>,
    ) -> Result<N, FailureCause> {
        match command {
            RelayCommand::Note { text, next } => {
                cx.interpreter().note(&text)?;
                Ok(next.resume(()))
            }
            RelayCommand::Forward { program, next } => Ok(next.resume(cx.run_child(program)?)),
            RelayCommand::ForwardAs {
                selector,
                program,
                next,
            } => Ok(next.resume(cx.run_child_as(&selector, program)?)),
            RelayCommand::Supervise { mut recipe, next } => {
                let value = match cx.supervise_child(None, || recipe())? {
                    ChildOutcome::Completed(value) => Ok(value),
                    ChildOutcome::Recovered(err) => Err(err.root_cause().code().to_string()),
                };
                Ok(next.resume(value))
            }
            RelayCommand::Pair { left, right, next } => {
                Ok(next.resume(cx.join_children(left, right)?))
            }
        }
    }
}

/// Relay interpreter that records notes.
#[derive(Default)]
pub struct NoteTaker {
    log: CallLog,
}

impl NoteTaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl RelayInterpreter for NoteTaker {
    fn note(&self, text: &str) -> Result<(), InterpreterFailure> {
        self.log.record(format!("note({text})"));
        Ok(())
    }
}

/// Probe interpreter that cancels `token` when it sees `trigger`.
pub struct CancellingProbe {
    pub token: CancelToken,
    pub trigger: i64,
}

impl ProbeInterpreter for CancellingProbe {
    fn emit(&self, value: i64) -> Result<i64, InterpreterFailure> {
        if value == self.trigger {
            self.token.cancel();
        }
        Ok(value)
    }
}

/// `emit(1) .. emit(n)` summed.
pub fn sum_to(n: i64) -> Program<Probe, i64> {
    fn go(i: i64, n: i64, acc: i64) -> Program<Probe, i64> {
        if i > n {
            return Program::pure(acc);
        }
        Probe::emit(i).bind(move |v| go(i + 1, n, acc + v))
    }
    go(1, n, 0)
}
