//! Tipos de repositorio: estado reconstruido (`RunInstance`) y definición
//! (`PipelineDefinition`).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! construye el estado de la corrida. Sólo guarda hashes de artifacts, nunca
//! su contenido.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{RunEvent, RunEventKind};
use crate::model::ArtifactKey;
use crate::stage::{StageDefinition, StageStatus};

/// Estado global de la corrida.
///
/// `Init -> Running(0) -> ... -> Running(n-1) -> Done`; cualquier estado no
/// terminal puede pasar a `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Init,
    Running { stage_index: usize },
    Done,
    Aborted { stage_index: usize },
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Done | RunStatus::Aborted { .. })
    }
}

pub struct RunInstance {
    pub id: Uuid,
    pub query: Option<String>,
    pub stages: Vec<StageSlot>,
    pub cursor: usize,
    pub status: RunStatus,
}

impl RunInstance {
    /// Hashes de los artifacts producidos, en orden de etapa.
    pub fn artifact_hashes(&self) -> Vec<String> {
        self.stages.iter().filter_map(|s| s.artifact_hash.clone()).collect()
    }
}

/// Estado de una etapa en la instancia.
pub struct StageSlot {
    pub stage_id: String,
    pub status: StageStatus,
    pub artifact_key: Option<ArtifactKey>,
    pub artifact_hash: Option<String>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Reconstruye (`replay`) el estado de una corrida a partir de eventos.
pub trait RunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance;
}

/// Definición inmutable del pipeline.
pub struct PipelineDefinition {
    pub stages: Vec<Box<dyn StageDefinition>>,
    pub definition_hash: String,
}

impl PipelineDefinition {
    pub fn new(stages: Vec<Box<dyn StageDefinition>>, definition_hash: String) -> Self {
        Self { stages, definition_hash }
    }
    pub fn len(&self) -> usize {
        self.stages.len()
    }
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRunRepository;

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance {
        let mut stages: Vec<StageSlot> = definition.stages
                                                   .iter()
                                                   .map(|s| StageSlot { stage_id: s.id().to_string(),
                                                                        status: StageStatus::Pending,
                                                                        artifact_key: None,
                                                                        artifact_hash: None,
                                                                        error: None,
                                                                        started_at: None,
                                                                        finished_at: None })
                                                   .collect();
        let mut query = None;
        let mut status = RunStatus::Init;
        for ev in events {
            match &ev.kind {
                RunEventKind::RunInitialized { query: q, .. } => query = Some(q.clone()),
                RunEventKind::StageStarted { stage_index, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                    status = RunStatus::Running { stage_index: *stage_index };
                }
                RunEventKind::StageFinished { stage_index,
                                              artifact_key,
                                              artifact_hash,
                                              .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::FinishedOk;
                        slot.artifact_key = artifact_key.clone();
                        slot.artifact_hash = artifact_hash.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageFailed { stage_index, error, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Failed;
                        slot.error = Some(error.to_string());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::RunAborted { stage_index, .. } => status = RunStatus::Aborted { stage_index: *stage_index },
                RunEventKind::RunCompleted { .. } => status = RunStatus::Done,
            }
        }
        let cursor = stages.iter()
                           .position(|s| matches!(s.status, StageStatus::Pending))
                           .unwrap_or(stages.len());
        RunInstance { id: run_id,
                      query,
                      stages,
                      cursor,
                      status }
    }
}

/// Construye la definición calculando el hash a partir de los ids y agentes
/// de cada etapa, en orden.
pub fn build_pipeline_definition(stages: Vec<Box<dyn StageDefinition>>) -> PipelineDefinition {
    use crate::hashing::{hash_str, to_canonical_json};
    use serde_json::json;
    let ids: Vec<serde_json::Value> = stages.iter()
                                            .map(|s| json!({"id": s.id(), "hash": s.definition_hash()}))
                                            .collect();
    let canonical = to_canonical_json(&json!(ids));
    PipelineDefinition::new(stages, hash_str(&canonical))
}
