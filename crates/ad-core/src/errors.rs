//! Errores específicos del core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("run already completed")] RunCompleted,
    #[error("run was aborted previously (stop-on-failure invariant)")] RunAborted,
    #[error("run not started")] RunNotStarted,
    #[error("pipeline has no stages configured")] EmptyPipeline,
    #[error("missing required artifact: {0}")] MissingArtifact(String),
    #[error("no usable data: {0}")] NoUsableData(String),
    #[error("generation failed: {0}")] Generation(String),
    #[error("artifact store: {0}")] ArtifactStore(String),
    #[error("artifact decode: {0}")] ArtifactDecode(String),
    #[error("io: {0}")] Io(String),
    #[error("stage panicked: {0}")] StagePanicked(String),
    #[error("internal: {0}")] Internal(String),
}
