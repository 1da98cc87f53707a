//! ad-core: motor secuencial de etapas con contención de fallos.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod repo;
pub mod sink;
pub mod stage;

pub use engine::{PipelineBuilder, PipelineEngine, RunOutcome};
pub use errors::CoreEngineError;
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use model::{Artifact, ArtifactDecodeError, ArtifactKey, ArtifactKind, ArtifactSpec, ArtifactStore,
                InMemoryArtifactStore};
pub use repo::{build_pipeline_definition, InMemoryRunRepository, PipelineDefinition, RunInstance, RunRepository,
               RunStatus};
pub use sink::{InMemoryLogSink, LogEntry, LogSink};
pub use stage::{StageContext, StageDefinition, StageRunResult, StageRunResultTyped, StageStatus, TypedStage};
