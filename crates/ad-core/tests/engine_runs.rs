use ad_core::{Artifact, ArtifactKey, ArtifactSpec, ArtifactStore, CoreEngineError, InMemoryArtifactStore,
              InMemoryEventStore, InMemoryLogSink, LogEntry, PipelineEngine, RunOutcome, RunStatus, StageContext,
              StageDefinition, StageRunResult, StageRunResultTyped, TypedStage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Numbers {
    values: Vec<i64>,
}

impl ArtifactSpec for Numbers {
    const FILE_NAME: &'static str = "numbers.json";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Total {
    total: i64,
}

impl ArtifactSpec for Total {
    const FILE_NAME: &'static str = "total.json";
}

struct Produce;

impl TypedStage for Produce {
    type Output = Numbers;
    fn id(&self) -> &'static str {
        "produce"
    }
    fn agent(&self) -> &'static str {
        "Producer"
    }
    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<Numbers> {
        ctx.log_step("load", "Producing numbers...");
        StageRunResultTyped::Success { output: Numbers { values: vec![1, 2, 3] } }
    }
}

struct Sum;

impl TypedStage for Sum {
    type Output = Total;
    fn id(&self) -> &'static str {
        "sum"
    }
    fn agent(&self) -> &'static str {
        "Summer"
    }
    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<Total> {
        ctx.require::<Numbers>()
           .map(|n| Total { total: n.values.iter().sum() })
           .into()
    }
}

struct Failing;

impl StageDefinition for Failing {
    fn id(&self) -> &str {
        "failing"
    }
    fn agent(&self) -> &str {
        "Breaker"
    }
    fn artifact_key(&self) -> Option<ArtifactKey> {
        Some(ArtifactKey::fixed("never.json"))
    }
    fn run(&self, _ctx: &mut StageContext<'_>) -> StageRunResult {
        StageRunResult::Failure { error: CoreEngineError::Generation("upstream unavailable".into()) }
    }
}

struct Panicking;

impl StageDefinition for Panicking {
    fn id(&self) -> &str {
        "panicking"
    }
    fn agent(&self) -> &str {
        "Panicker"
    }
    fn artifact_key(&self) -> Option<ArtifactKey> {
        None
    }
    fn run(&self, _ctx: &mut StageContext<'_>) -> StageRunResult {
        panic!("index out of range")
    }
}

/// Store que rechaza toda escritura.
#[derive(Default)]
struct ReadOnlyStore;

impl ArtifactStore for ReadOnlyStore {
    fn write(&mut self, key: &ArtifactKey, _artifact: &Artifact) -> Result<(), CoreEngineError> {
        Err(CoreEngineError::ArtifactStore(format!("read-only: {key}")))
    }
    fn read(&self, _key: &ArtifactKey) -> Option<Artifact> {
        None
    }
}

#[test]
fn full_run_persists_every_artifact_in_order() {
    let mut engine = PipelineEngine::in_memory().stage(Produce).stage(Sum).build();
    let outcome = engine.run("sum the numbers").expect("run");

    assert!(outcome.is_completed());
    assert_eq!(engine.event_variants(), vec!["I", "S", "F", "S", "F", "C"]);
    assert_eq!(engine.status(), Some(RunStatus::Done));

    let total = engine.artifacts().read(&Total::key()).expect("total persisted");
    assert_eq!(Total::from_artifact(&total).expect("decode"), Total { total: 6 });
    assert!(!total.hash.is_empty());

    let sink = engine.sink();
    assert_eq!(sink.events_for("Producer"), vec!["started", "completed"]);
    assert_eq!(sink.events_for("System"), vec!["completed"]);
    assert!(sink.entries
                .iter()
                .any(|e| matches!(e, LogEntry::Step { step, .. } if step == "load")));
}

#[test]
fn rerun_uses_fresh_run_id_and_same_fingerprint() {
    let mut engine = PipelineEngine::in_memory().stage(Produce).stage(Sum).build();
    let first = engine.run("q").expect("first");
    let second = engine.run("q").expect("second");
    assert_ne!(first.run_id(), second.run_id());
    match (first, second) {
        (RunOutcome::Completed { run_fingerprint: a, .. }, RunOutcome::Completed { run_fingerprint: b, .. }) => {
            assert_eq!(a, b)
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
}

#[test]
fn stage_failure_aborts_and_keeps_earlier_artifacts() {
    let mut engine = PipelineEngine::in_memory().stage(Produce).stage(Failing).stage(Sum).build();
    let outcome = engine.run("q").expect("contained");

    match outcome {
        RunOutcome::Aborted { stage_id, error, .. } => {
            assert_eq!(stage_id, "failing");
            assert_eq!(error, CoreEngineError::Generation("upstream unavailable".into()));
        }
        other => panic!("expected abort, got {other:?}"),
    }
    assert_eq!(engine.event_variants(), vec!["I", "S", "F", "S", "X", "A"]);
    assert_eq!(engine.status(), Some(RunStatus::Aborted { stage_index: 1 }));
    assert!(engine.artifacts().read(&Numbers::key()).is_some());
    assert!(engine.artifacts().read(&Total::key()).is_none());
    assert!(engine.sink().events_for("Summer").is_empty());
    assert_eq!(engine.sink().events_for("Breaker"), vec!["started", "failed"]);
    assert_eq!(engine.run_fingerprint(), None);
    assert_eq!(engine.step(), Err(CoreEngineError::RunAborted));
}

#[test]
fn panic_inside_stage_is_contained() {
    let mut engine = PipelineEngine::in_memory().stage(Panicking).stage(Produce).build();
    let outcome = engine.run("q").expect("contained");
    match outcome {
        RunOutcome::Aborted { error: CoreEngineError::StagePanicked(msg), .. } => {
            assert!(msg.contains("index out of range"))
        }
        other => panic!("expected panic abort, got {other:?}"),
    }
    assert!(engine.artifacts().read(&Numbers::key()).is_none());
}

#[test]
fn missing_upstream_artifact_is_a_stage_failure() {
    let mut engine = PipelineEngine::in_memory().stage(Sum).build();
    match engine.run("q").expect("contained") {
        RunOutcome::Aborted { error, .. } => {
            assert_eq!(error, CoreEngineError::MissingArtifact("numbers.json".into()))
        }
        other => panic!("expected abort, got {other:?}"),
    }
}

#[test]
fn write_failure_is_a_stage_failure() {
    let mut engine = PipelineEngine::builder(InMemoryEventStore::default(), ReadOnlyStore, InMemoryLogSink::new())
        .stage(Produce)
        .build();
    match engine.run("q").expect("contained") {
        RunOutcome::Aborted { error: CoreEngineError::ArtifactStore(msg), .. } => assert!(msg.contains("numbers.json")),
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[test]
fn step_by_step_and_edge_states() {
    let mut empty = PipelineEngine::in_memory().build();
    assert_eq!(empty.run("q"), Err(CoreEngineError::EmptyPipeline));

    let mut engine = PipelineEngine::in_memory().stage(Produce).stage(Sum).build();
    assert_eq!(engine.step(), Err(CoreEngineError::RunNotStarted));
    engine.start("q").expect("start");
    assert_eq!(engine.status(), Some(RunStatus::Init));
    engine.step().expect("first stage");
    assert_eq!(engine.status(), Some(RunStatus::Running { stage_index: 0 }));
    engine.step().expect("second stage");
    assert_eq!(engine.status(), Some(RunStatus::Done));
    assert_eq!(engine.step(), Err(CoreEngineError::RunCompleted));
    assert!(engine.run_fingerprint().is_some());
}

#[test]
fn in_memory_store_lists_keys_sorted() {
    let mut store = InMemoryArtifactStore::new();
    store.write(&ArtifactKey::fixed("b.json"), &Artifact::json(serde_json::json!({})))
         .expect("write");
    store.write(&ArtifactKey::fixed("a.md"), &Artifact::markdown("# a")).expect("write");
    assert_eq!(store.keys(), vec![ArtifactKey::fixed("a.md"), ArtifactKey::fixed("b.json")]);
}
