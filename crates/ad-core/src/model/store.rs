//! Puerto de almacenamiento de artifacts.
//!
//! Es el único medio de comunicación entre etapas: cada etapa relee del
//! store lo que necesita; nunca recibe objetos en memoria de otra etapa.
//! La implementación en disco vive en `ad-persistence`.
use std::collections::HashMap;

use super::{Artifact, ArtifactKey};
use crate::errors::CoreEngineError;

pub trait ArtifactStore {
    /// Persiste (o sobreescribe) el artifact bajo `key`.
    fn write(&mut self, key: &ArtifactKey, artifact: &Artifact) -> Result<(), CoreEngineError>;
    /// Lee un artifact. Ausente o ilegible => `None`.
    fn read(&self, key: &ArtifactKey) -> Option<Artifact>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryArtifactStore {
    pub inner: HashMap<ArtifactKey, Artifact>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<ArtifactKey> {
        let mut keys: Vec<ArtifactKey> = self.inner.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn write(&mut self, key: &ArtifactKey, artifact: &Artifact) -> Result<(), CoreEngineError> {
        self.inner.insert(key.clone(), artifact.clone());
        Ok(())
    }

    fn read(&self, key: &ArtifactKey) -> Option<Artifact> {
        self.inner.get(key).cloned()
    }
}
