//! Errores de persistencia.
//! Mapea errores de IO / serde a variantes semánticas.

use ad_core::CoreEngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("artifact {0} has no text payload")]
    NotText(String),
}

impl PersistenceError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().display().to_string(),
                   source }
    }
}

impl From<PersistenceError> for CoreEngineError {
    fn from(e: PersistenceError) -> Self {
        CoreEngineError::ArtifactStore(e.to_string())
    }
}
