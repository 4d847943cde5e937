//! Child programs: isolation, failure propagation, policies, parallelism.

mod common;

use common::{init_tracing, sum_to, CancellingProbe, NoteTaker, Relay};
use hfm_engine::config::{EngineSettings, HfmConfig};
use hfm_engine::testing::{Probe, RecordingObserver, ScriptedProbe};
use hfm_engine::{Engine, FailureCause, FailurePolicy, InterpreterFailure, InterpreterRegistry};
use hfm_types::ErrorCode;
use std::sync::Arc;

#[test]
fn child_runs_with_its_own_interpreter() {
    init_tracing();
    let notes = NoteTaker::new();
    let note_log = notes.log();
    let probe = ScriptedProbe::new().with_offset(1);
    let probe_log = probe.log();
    let registry = InterpreterRegistry::new()
        .with::<Probe>(Arc::new(probe))
        .with::<Relay>(Arc::new(notes));
    let observer = Arc::new(RecordingObserver::new());

    let program = Relay::note("start")
        .then(Relay::forward(sum_to(3)))
        .bind(|total| Relay::note(&format!("total {total}")).map(move |()| total));

    let total = Engine::new()
        .with_observer(observer.clone())
        .execute(program, &registry)
        .expect("run succeeds");

    assert_eq!(total, 2 + 3 + 4);
    assert_eq!(note_log.entries(), vec!["note(start)", "note(total 9)"]);
    assert_eq!(probe_log.entries(), vec!["emit(1)", "emit(2)", "emit(3)"]);

    let depths: Vec<(usize, String)> = observer
        .frames()
        .into_iter()
        .map(|frame| (frame.depth, frame.command.qualified_name()))
        .collect();
    assert_eq!(
        depths,
        vec![
            (0, "relay::Note".to_string()),
            (0, "relay::Forward".to_string()),
            (1, "probe::Emit".to_string()),
            (1, "probe::Emit".to_string()),
            (1, "probe::Emit".to_string()),
            (0, "relay::Note".to_string()),
        ]
    );
    assert_eq!(observer.last_step_count(), Some(3));

    let runs: std::collections::HashSet<_> = observer.frames().iter().map(|f| f.run).collect();
    assert_eq!(runs.len(), 1);
}

#[test]
fn child_failure_fails_parent_step() {
    let notes = NoteTaker::new();
    let note_log = notes.log();
    let registry = InterpreterRegistry::new()
        .with::<Probe>(Arc::new(
            ScriptedProbe::new().fail_on(2, InterpreterFailure::failed("burnt")),
        ))
        .with::<Relay>(Arc::new(notes));

    let program = Relay::forward(sum_to(3)).then(Relay::note("after"));
    let err = Engine::new().execute(program, &registry).unwrap_err();

    assert_eq!(err.code(), "EXECUTION_CHILD_FAILED");
    assert_eq!(err.command().qualified_name(), "relay::Forward");
    assert!(err.is_recoverable());
    assert!(note_log.is_empty());

    let path: Vec<String> = err.path().iter().map(|f| f.to_string()).collect();
    assert_eq!(
        path,
        vec![
            "step 0 at depth 0 (relay::Forward)",
            "step 1 at depth 1 (probe::Emit(2))",
        ]
    );
    assert!(matches!(
        err.root_cause(),
        FailureCause::Interpreter(InterpreterFailure::Failed(_))
    ));
}

#[test]
fn unbound_child_algebra_fails_parent() {
    let registry = InterpreterRegistry::new().with::<Relay>(Arc::new(NoteTaker::new()));

    let err = Engine::new()
        .execute(Relay::forward(Probe::emit(1)), &registry)
        .unwrap_err();

    assert_eq!(err.code(), "EXECUTION_CHILD_FAILED");
    assert_eq!(err.root_cause().code(), "EXECUTION_UNBOUND_ALGEBRA");
}

#[test]
fn child_selector_picks_named_binding() {
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with_named::<Probe>("tens", Arc::new(ScriptedProbe::new().with_offset(10)))
        .with_named::<Probe>("hundreds", Arc::new(ScriptedProbe::new().with_offset(100)));

    let program = Relay::forward_as("tens", Probe::emit(1))
        .bind(|a| Relay::forward_as("hundreds", Probe::emit(a)));

    assert_eq!(Engine::new().execute(program, &registry).ok(), Some(111));

    let err = Engine::new()
        .execute(Relay::forward(Probe::emit(1)), &registry)
        .unwrap_err();
    assert_eq!(err.root_cause().code(), "EXECUTION_UNBOUND_ALGEBRA");
}

#[test]
fn nesting_bound_is_enforced() {
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(ScriptedProbe::new()));
    let engine = Engine::new().with_settings(EngineSettings {
        max_depth: 0,
        ..EngineSettings::default()
    });

    let err = engine
        .execute(Relay::forward(Probe::emit(1)), &registry)
        .unwrap_err();

    assert!(matches!(err.cause(), FailureCause::NestingTooDeep { limit: 0 }));
    assert_eq!(err.frame().depth, 0);
}

#[test]
fn retry_policy_rebuilds_recoverable_child() {
    let probe = ScriptedProbe::new().fail_times(7, 2, InterpreterFailure::unavailable("oven busy"));
    let log = probe.log();
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(probe));
    let engine = Engine::new().with_policy::<Probe>(FailurePolicy::Retry { attempts: 3 });

    let value = engine
        .execute(Relay::supervise(|| Probe::emit(7)), &registry)
        .expect("third attempt succeeds");

    assert_eq!(value, Ok(7));
    assert_eq!(log.len(), 3);
}

#[test]
fn retry_policy_gives_up_after_attempts() {
    let probe = ScriptedProbe::new().fail_on(7, InterpreterFailure::unavailable("oven gone"));
    let log = probe.log();
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(probe));
    let engine = Engine::new().with_policy::<Probe>(FailurePolicy::Retry { attempts: 2 });

    let err = engine
        .execute(Relay::supervise(|| Probe::emit(7)), &registry)
        .unwrap_err();

    assert_eq!(err.root_cause().code(), "EXECUTION_INTERPRETER_FAILED");
    assert_eq!(log.len(), 2);
}

#[test]
fn retry_policy_skips_unrecoverable_failure() {
    let probe = ScriptedProbe::new().fail_on(7, InterpreterFailure::rejected("no"));
    let log = probe.log();
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(probe));
    let engine = Engine::new().with_policy::<Probe>(FailurePolicy::Retry { attempts: 5 });

    assert!(engine
        .execute(Relay::supervise(|| Probe::emit(7)), &registry)
        .is_err());
    assert_eq!(log.len(), 1);
}

#[test]
fn recover_policy_hands_failure_to_parent() {
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(
            ScriptedProbe::new().fail_on(7, InterpreterFailure::rejected("no")),
        ));

    let mut config = HfmConfig::default();
    config.policies.insert("probe".into(), FailurePolicy::Recover);
    let engine = Engine::from_config(&config);

    let value = engine
        .execute(Relay::supervise(|| Probe::emit(7)), &registry)
        .expect("recovered");
    assert_eq!(value, Err("EXECUTION_INTERPRETER_FAILED".to_string()));
}

#[test]
fn propagate_is_the_default_policy() {
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(
            ScriptedProbe::new().fail_on(7, InterpreterFailure::unavailable("x")),
        ));

    let err = Engine::new()
        .execute(Relay::supervise(|| Probe::emit(7)), &registry)
        .unwrap_err();
    assert_eq!(err.code(), "EXECUTION_CHILD_FAILED");
}

#[test]
fn cancellation_is_never_recovered() {
    let engine = Engine::new().with_policy::<Probe>(FailurePolicy::Recover);
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(CancellingProbe {
            token: engine.cancel_token(),
            trigger: 1,
        }));

    let err = engine
        .execute(Relay::supervise(|| sum_to(3)), &registry)
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn independent_children_join() {
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(ScriptedProbe::new()));
    let observer = Arc::new(RecordingObserver::new());

    let pair = Engine::new()
        .with_observer(observer.clone())
        .execute(Relay::pair(sum_to(3), sum_to(4)), &registry)
        .expect("both children succeed");

    assert_eq!(pair, (6, 10));
    let child_steps = observer.frames().iter().filter(|f| f.depth == 1).count();
    assert_eq!(child_steps, 7);
}

#[test]
fn joined_child_failure_fails_parent() {
    let registry = InterpreterRegistry::new()
        .with::<Relay>(Arc::new(NoteTaker::new()))
        .with::<Probe>(Arc::new(
            ScriptedProbe::new().fail_on(4, InterpreterFailure::rejected("four")),
        ));

    let err = Engine::new()
        .execute(Relay::pair(sum_to(2), sum_to(4)), &registry)
        .unwrap_err();

    assert_eq!(err.command().qualified_name(), "relay::Pair");
    assert_eq!(err.innermost().command().to_string(), "probe::Emit(4)");
}
