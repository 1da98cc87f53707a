//! Builder para `PipelineEngine`.
//!
//! Acumula las etapas en orden de ejecución y calcula el hash de la
//! definición al construir. Las stores y el sink se entregan al inicio y
//! pasan a ser propiedad del engine.
//!
//! ```ignore
//! let mut engine = PipelineEngine::builder(events, store, sink)
//!     .stage(PlannerStage::new(..))
//!     .stage(SummarizeStage::new(..))
//!     .build();
//! ```

use crate::engine::PipelineEngine;
use crate::event::EventStore;
use crate::model::ArtifactStore;
use crate::repo::build_pipeline_definition;
use crate::sink::LogSink;
use crate::stage::StageDefinition;

pub struct PipelineBuilder<E: EventStore, A: ArtifactStore, S: LogSink> {
    pub(crate) event_store: E,
    pub(crate) artifacts: A,
    pub(crate) sink: S,
    stages: Vec<Box<dyn StageDefinition>>,
}

impl<E: EventStore, A: ArtifactStore, S: LogSink> PipelineBuilder<E, A, S> {
    pub(crate) fn new(event_store: E, artifacts: A, sink: S) -> Self {
        Self { event_store,
               artifacts,
               sink,
               stages: Vec::new() }
    }

    /// Añade una etapa al final del pipeline.
    #[inline]
    pub fn stage<T>(mut self, stage: T) -> Self
        where T: StageDefinition + 'static
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Variante para etapas ya boxeadas (p.ej. ensambladas dinámicamente).
    pub fn boxed_stage(mut self, stage: Box<dyn StageDefinition>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> PipelineEngine<E, A, S> {
        let definition = build_pipeline_definition(self.stages);
        PipelineEngine::from_parts(self.event_store, self.artifacts, self.sink, definition)
    }
}
