use crate::{errors::CoreEngineError, model::Artifact};

/// Resultado abstracto de ejecutar una etapa.
pub enum StageRunResult {
    Success { artifact: Option<Artifact> },
    Failure { error: CoreEngineError },
}
