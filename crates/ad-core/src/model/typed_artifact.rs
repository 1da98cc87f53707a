//! Infraestructura de tipado fuerte para `Artifact` manteniendo el núcleo
//! agnóstico. Cada tipo declara la clave bien conocida bajo la cual se
//! persiste y cómo se (de)serializa su payload.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Artifact, ArtifactKey, ArtifactKind};
use crate::errors::CoreEngineError;

/// Errores posibles al decodificar un artifact tipado.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArtifactDecodeError {
    #[error("kind mismatch: expected {expected:?}, found {found:?}")]
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    #[error("deserialize: {0}")]
    Deserialize(String),
    #[error("validation: {0}")]
    Validation(String),
}

impl From<ArtifactDecodeError> for CoreEngineError {
    fn from(e: ArtifactDecodeError) -> Self {
        CoreEngineError::ArtifactDecode(e.to_string())
    }
}

/// Especificación de un artifact tipado.
pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned {
    /// Nombre de archivo bajo el que se persiste.
    const FILE_NAME: &'static str;
    /// Formato en el store.
    const KIND: ArtifactKind = ArtifactKind::Json;

    fn key() -> ArtifactKey {
        ArtifactKey::fixed(Self::FILE_NAME)
    }

    /// Validación semántica ligera (sin efectos secundarios).
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Payload a persistir. Por defecto la serialización serde del tipo.
    fn to_payload(&self) -> Result<Value, ArtifactDecodeError> {
        serde_json::to_value(self).map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))
    }

    /// Reconstruye el tipo desde el payload persistido.
    fn from_payload(payload: &Value) -> Result<Self, ArtifactDecodeError> {
        serde_json::from_value(payload.clone()).map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))
    }

    /// Serializa a `Artifact` sin hash (lo añadirá el engine).
    fn to_artifact(&self) -> Result<Artifact, ArtifactDecodeError> {
        Ok(Artifact::new_unhashed(Self::KIND, self.to_payload()?, None))
    }

    /// Decodifica desde artifact neutro verificando kind y validación.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactDecodeError> {
        if a.kind != Self::KIND {
            return Err(ArtifactDecodeError::KindMismatch { expected: Self::KIND,
                                                           found: a.kind });
        }
        let decoded = Self::from_payload(&a.payload)?;
        decoded.validate().map_err(ArtifactDecodeError::Validation)?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        text: String,
    }

    impl ArtifactSpec for Note {
        const FILE_NAME: &'static str = "note.json";
        fn validate(&self) -> Result<(), String> {
            if self.text.is_empty() { Err("empty note".into()) } else { Ok(()) }
        }
    }

    #[test]
    fn typed_artifact_roundtrip_and_validation() {
        let note = Note { text: "hola".into() };
        let art = note.to_artifact().expect("encode");
        assert_eq!(art.kind, ArtifactKind::Json);
        assert_eq!(Note::from_artifact(&art).expect("decode"), note);

        let bad = Note { text: String::new() }.to_artifact().expect("encode");
        assert!(matches!(Note::from_artifact(&bad), Err(ArtifactDecodeError::Validation(_))));

        let md = Artifact::markdown("# x");
        assert!(matches!(Note::from_artifact(&md), Err(ArtifactDecodeError::KindMismatch { .. })));
        assert_eq!(Note::key().file_name(), "note.json");
    }
}
