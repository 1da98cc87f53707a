//! Implementación del `PipelineEngine`.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};
use uuid::Uuid;

use crate::constants::{ENGINE_VERSION, SYSTEM_AGENT};
use crate::engine::PipelineBuilder;
use crate::errors::CoreEngineError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::model::{Artifact, ArtifactKind, ArtifactStore, InMemoryArtifactStore};
use crate::repo::{InMemoryRunRepository, PipelineDefinition, RunInstance, RunRepository, RunStatus};
use crate::sink::{InMemoryLogSink, LogEntry, LogSink};
use crate::stage::{StageContext, StageRunResult};

/// Resultado de una corrida completa.
///
/// Un fallo de etapa no es un error del engine: queda contenido y se
/// reporta como `Aborted`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { run_id: Uuid, run_fingerprint: String },
    Aborted { run_id: Uuid, stage_id: String, error: CoreEngineError },
}

impl RunOutcome {
    pub fn run_id(&self) -> Uuid {
        match self {
            RunOutcome::Completed { run_id, .. } | RunOutcome::Aborted { run_id, .. } => *run_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Motor de ejecución secuencial de etapas.
///
/// Orquesta las etapas en orden estricto, contiene sus fallos en el límite
/// de cada etapa y persiste cada artifact antes de pasar a la siguiente. El
/// estado de la corrida se reconstruye siempre por replay de eventos.
pub struct PipelineEngine<E, A, S>
    where E: EventStore,
          A: ArtifactStore,
          S: LogSink
{
    event_store: E,
    repository: InMemoryRunRepository,
    artifacts: A,
    sink: S,
    definition: PipelineDefinition,
    current_run: Option<(Uuid, String)>,
}

impl PipelineEngine<InMemoryEventStore, InMemoryArtifactStore, InMemoryLogSink> {
    /// Builder con stores y sink en memoria.
    #[inline]
    pub fn in_memory() -> PipelineBuilder<InMemoryEventStore, InMemoryArtifactStore, InMemoryLogSink> {
        PipelineBuilder::new(InMemoryEventStore::default(),
                             InMemoryArtifactStore::new(),
                             InMemoryLogSink::new())
    }
}

impl<E, A, S> PipelineEngine<E, A, S>
    where E: EventStore,
          A: ArtifactStore,
          S: LogSink
{
    #[inline]
    pub fn builder(event_store: E, artifacts: A, sink: S) -> PipelineBuilder<E, A, S> {
        PipelineBuilder::new(event_store, artifacts, sink)
    }

    pub(crate) fn from_parts(event_store: E, artifacts: A, sink: S, definition: PipelineDefinition) -> Self {
        Self { event_store,
               repository: InMemoryRunRepository::new(),
               artifacts,
               sink,
               definition,
               current_run: None }
    }

    pub fn definition(&self) -> &PipelineDefinition {
        &self.definition
    }

    pub fn artifacts(&self) -> &A {
        &self.artifacts
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// `run_id` de la corrida en curso (o la última iniciada).
    pub fn current_run_id(&self) -> Option<Uuid> {
        self.current_run.as_ref().map(|(id, _)| *id)
    }

    /// Inicia una corrida nueva con un `run_id` fresco. No hay reanudación:
    /// una corrida previa queda intacta en el event store.
    pub fn start(&mut self, query: &str) -> Result<Uuid, CoreEngineError> {
        if self.definition.is_empty() {
            return Err(CoreEngineError::EmptyPipeline);
        }
        let run_id = Uuid::new_v4();
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunInitialized { query: query.to_string(),
                                                                    definition_hash:
                                                                        self.definition.definition_hash.clone(),
                                                                    stage_count: self.definition.len() });
        log::debug!("run {run_id} initialized with {} stages", self.definition.len());
        self.current_run = Some((run_id, query.to_string()));
        Ok(run_id)
    }

    /// Ejecuta la corrida completa para `query`.
    ///
    /// Sólo devuelve `Err` si el pipeline no tiene etapas; cualquier fallo de
    /// etapa termina la corrida como `RunOutcome::Aborted`.
    pub fn run(&mut self, query: &str) -> Result<RunOutcome, CoreEngineError> {
        let run_id = self.start(query)?;
        loop {
            match self.step() {
                Ok(()) => continue,
                Err(CoreEngineError::RunCompleted) => {
                    let run_fingerprint = self.run_fingerprint().unwrap_or_default();
                    return Ok(RunOutcome::Completed { run_id, run_fingerprint });
                }
                Err(CoreEngineError::RunAborted) => return Ok(self.aborted_outcome(run_id)),
                Err(e) => return Err(e),
            }
        }
    }

    /// Avanza exactamente una etapa de la corrida en curso.
    ///
    /// `Ok(())` tanto si la etapa terminó bien como si falló (el fallo queda
    /// registrado). Devuelve `RunCompleted`/`RunAborted` cuando la corrida ya
    /// está en un estado terminal.
    pub fn step(&mut self) -> Result<(), CoreEngineError> {
        let (run_id, query) = self.current_run.clone().ok_or(CoreEngineError::RunNotStarted)?;
        let instance = self.load_instance(run_id);
        match instance.status {
            RunStatus::Done => return Err(CoreEngineError::RunCompleted),
            RunStatus::Aborted { .. } => return Err(CoreEngineError::RunAborted),
            RunStatus::Init | RunStatus::Running { .. } => {}
        }

        let cursor = instance.cursor;
        if cursor >= self.definition.len() {
            self.complete_run(run_id, &instance);
            return Err(CoreEngineError::RunCompleted);
        }

        let stage = &self.definition.stages[cursor];
        let stage_id = stage.id().to_string();
        let agent = stage.agent().to_string();

        self.event_store.append_kind(run_id,
                                     RunEventKind::StageStarted { stage_index: cursor,
                                                                  stage_id: stage_id.clone() });
        self.sink.append(LogEntry::event(&agent,
                                         "started",
                                         json!({"run_id": run_id.to_string(), "phase": stage.phase()})));
        if !stage.description().is_empty() {
            println!("\n[{}] {}", agent, stage.description());
        }
        log::info!("stage {} ({}) started", stage_id, stage.phase());

        let result = {
            let mut ctx = StageContext::new(run_id, &query, &agent, &self.artifacts, &mut self.sink);
            match panic::catch_unwind(AssertUnwindSafe(|| stage.run(&mut ctx))) {
                Ok(r) => r,
                Err(payload) => StageRunResult::Failure { error: CoreEngineError::StagePanicked(panic_message(payload)) },
            }
        };

        let artifact_key = stage.artifact_key();
        let persisted = match result {
            StageRunResult::Success { artifact: None } => Ok(None),
            StageRunResult::Success { artifact: Some(artifact) } => match artifact_key {
                Some(key) => {
                    let mut artifact = artifact;
                    artifact.hash = hash_value(&artifact.payload);
                    self.artifacts.write(&key, &artifact).map(|_| Some((key, artifact)))
                }
                None => Err(CoreEngineError::Internal(format!("stage '{stage_id}' produced an artifact without a key"))),
            },
            StageRunResult::Failure { error } => Err(error),
        };

        match persisted {
            Ok(output) => {
                let details = output.as_ref().map(|(key, a)| completed_details(key.file_name(), a)).unwrap_or(Value::Null);
                let (artifact_key, artifact_hash) = match output {
                    Some((key, a)) => {
                        println!("{} saved ({}).", key.file_name(), &a.hash[..12.min(a.hash.len())]);
                        (Some(key), Some(a.hash))
                    }
                    None => (None, None),
                };
                self.event_store.append_kind(run_id,
                                             RunEventKind::StageFinished { stage_index: cursor,
                                                                           stage_id: stage_id.clone(),
                                                                           artifact_key,
                                                                           artifact_hash });
                self.sink.append(LogEntry::event(&agent, "completed", details));
                log::info!("stage {stage_id} finished");
                if cursor + 1 == self.definition.len() {
                    let instance = self.load_instance(run_id);
                    self.complete_run(run_id, &instance);
                }
            }
            Err(error) => {
                println!("{agent} failed: {error}");
                log::error!("stage {stage_id} failed: {error}");
                self.sink.append(LogEntry::event(&agent, "failed", json!({"error": error.to_string()})));
                self.event_store.append_kind(run_id,
                                             RunEventKind::StageFailed { stage_index: cursor,
                                                                         stage_id: stage_id.clone(),
                                                                         error });
                self.event_store.append_kind(run_id,
                                             RunEventKind::RunAborted { stage_index: cursor,
                                                                        stage_id: stage_id.clone() });
                self.sink.append(LogEntry::event(SYSTEM_AGENT,
                                                 "aborted",
                                                 json!({"run_id": run_id.to_string(), "stage": stage_id})));
            }
        }
        Ok(())
    }

    fn load_instance(&self, run_id: Uuid) -> RunInstance {
        let events = self.event_store.list(run_id);
        self.repository.load(run_id, &events, &self.definition)
    }

    fn complete_run(&mut self, run_id: Uuid, instance: &RunInstance) {
        let run_fingerprint = self.fingerprint_for(instance);
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunCompleted { run_fingerprint: run_fingerprint.clone() });
        self.sink.append(LogEntry::event(SYSTEM_AGENT,
                                         "completed",
                                         json!({"run_id": run_id.to_string(), "run_fingerprint": run_fingerprint})));
        log::info!("run {run_id} completed");
    }

    fn fingerprint_for(&self, instance: &RunInstance) -> String {
        hash_value(&json!({
                       "engine_version": ENGINE_VERSION,
                       "definition_hash": self.definition.definition_hash,
                       "artifact_hashes": instance.artifact_hashes(),
                   }))
    }

    fn aborted_outcome(&self, run_id: Uuid) -> RunOutcome {
        let events = self.event_store.list(run_id);
        let failed = events.iter().rev().find_map(|e| match &e.kind {
                                             RunEventKind::StageFailed { stage_id, error, .. } => {
                                                 Some((stage_id.clone(), error.clone()))
                                             }
                                             _ => None,
                                         });
        let (stage_id, error) =
            failed.unwrap_or_else(|| (String::new(), CoreEngineError::Internal("abort without failure event".into())));
        RunOutcome::Aborted { run_id, stage_id, error }
    }

    /// Eventos de la corrida en curso.
    pub fn events(&self) -> Vec<RunEvent> {
        self.current_run_id().map(|id| self.event_store.list(id)).unwrap_or_default()
    }

    /// Nombres de las variantes de evento, en orden (útil en tests).
    pub fn event_variants(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .map(|e| match e.kind {
                RunEventKind::RunInitialized { .. } => "I",
                RunEventKind::StageStarted { .. } => "S",
                RunEventKind::StageFinished { .. } => "F",
                RunEventKind::StageFailed { .. } => "X",
                RunEventKind::RunAborted { .. } => "A",
                RunEventKind::RunCompleted { .. } => "C",
            })
            .collect()
    }

    /// Estado reconstruido de la corrida en curso.
    pub fn status(&self) -> Option<RunStatus> {
        self.current_run_id().map(|id| self.load_instance(id).status)
    }

    /// Fingerprint agregado, disponible sólo si la corrida completó.
    pub fn run_fingerprint(&self) -> Option<String> {
        self.events().iter().rev().find_map(|e| match &e.kind {
                                       RunEventKind::RunCompleted { run_fingerprint } => Some(run_fingerprint.clone()),
                                       _ => None,
                                   })
    }
}

fn completed_details(file_name: &str, artifact: &Artifact) -> Value {
    match artifact.kind {
        ArtifactKind::Json => artifact.payload.clone(),
        ArtifactKind::Markdown => json!({"output": file_name}),
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
