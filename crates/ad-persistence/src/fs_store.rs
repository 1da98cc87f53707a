//! Store de artifacts sobre un directorio.
//!
//! Cada clave es un archivo dentro de `root`. JSON se escribe indentado a 2
//! espacios sin escapar no-ASCII; Markdown se escribe tal cual. Un archivo
//! ausente o ilegible se lee como `None`.
use std::fs;
use std::path::{Path, PathBuf};

use ad_core::hashing::hash_value;
use ad_core::{Artifact, ArtifactKey, ArtifactKind, ArtifactStore, CoreEngineError};
use serde_json::Value;

use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Abre (creando si hace falta) el directorio raíz.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PersistenceError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn encode(key: &ArtifactKey, artifact: &Artifact) -> Result<String, PersistenceError> {
        match artifact.kind {
            ArtifactKind::Json => Ok(serde_json::to_string_pretty(&artifact.payload)?),
            ArtifactKind::Markdown => artifact.as_text()
                                              .map(str::to_string)
                                              .ok_or_else(|| PersistenceError::NotText(key.to_string())),
        }
    }

    pub fn write_artifact(&self, key: &ArtifactKey, artifact: &Artifact) -> Result<PathBuf, PersistenceError> {
        let path = self.path_for(key);
        let text = Self::encode(key, artifact)?;
        fs::write(&path, text).map_err(|e| PersistenceError::io(&path, e))?;
        log::debug!("artifact written: {}", path.display());
        Ok(path)
    }

    pub fn read_artifact(&self, key: &ArtifactKey) -> Option<Artifact> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return None;
            }
        };
        let mut artifact = match key.kind() {
            ArtifactKind::Markdown => Artifact::markdown(text),
            ArtifactKind::Json => match serde_json::from_str::<Value>(&text) {
                Ok(v) => Artifact::json(v),
                Err(e) => {
                    log::warn!("failed to parse JSON from {}: {e}", key);
                    return None;
                }
            },
        };
        artifact.hash = hash_value(&artifact.payload);
        Some(artifact)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write(&mut self, key: &ArtifactKey, artifact: &Artifact) -> Result<(), CoreEngineError> {
        self.write_artifact(key, artifact).map(|_| ()).map_err(CoreEngineError::from)
    }

    fn read(&self, key: &ArtifactKey) -> Option<Artifact> {
        self.read_artifact(key)
    }
}
