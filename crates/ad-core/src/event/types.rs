//! Tipos de evento de la corrida y estructura `RunEvent`.
//!
//! Rol en el pipeline:
//! - Cada ejecución del `PipelineEngine` emite eventos a un `EventStore`
//!   append-only.
//! - El estado de la corrida (`RunInstance`) se reconstruye por replay de
//!   estos eventos; el engine no mantiene un cursor mutable propio.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::model::ArtifactKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija la query y la cantidad de etapas.
    RunInitialized { query: String, definition_hash: String, stage_count: usize },
    /// Una etapa comenzó. No implica éxito.
    StageStarted { stage_index: usize, stage_id: String },
    /// Una etapa terminó y su artifact (si lo hay) ya está persistido.
    StageFinished {
        stage_index: usize,
        stage_id: String,
        artifact_key: Option<ArtifactKey>,
        artifact_hash: Option<String>,
    },
    /// Una etapa falló; el error quedó contenido en el límite de la etapa.
    StageFailed { stage_index: usize, stage_id: String, error: CoreEngineError },
    /// Estado terminal tras un fallo. Las etapas siguientes no se ejecutan.
    RunAborted { stage_index: usize, stage_id: String },
    /// Cierre con fingerprint agregado de los artifacts producidos.
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // orden de append
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}
