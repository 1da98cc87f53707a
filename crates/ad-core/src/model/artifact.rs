//! Artifact neutral de la corrida.
//!
//! Un `Artifact` es la unidad de datos que una etapa entrega al motor y que
//! el motor persiste en el `ArtifactStore`. Es neutral:
//! - `payload` es JSON genérico; el motor no interpreta su semántica. Para
//!   documentos Markdown el payload es un `Value::String`.
//! - `hash` lo calcula el engine sobre el JSON canonicalizado antes de
//!   persistir.
//! - `metadata` permite anotar información auxiliar que no entra al hash.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Formato de serialización del artifact en el store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Documento JSON indentado.
    Json,
    /// Texto Markdown plano.
    Markdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,            // asignado por el engine
    pub payload: Value,
    pub metadata: Option<Value>, // no entra al hash
}

impl Artifact {
    pub fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }

    pub fn json(payload: Value) -> Self {
        Self::new_unhashed(ArtifactKind::Json, payload, None)
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::new_unhashed(ArtifactKind::Markdown, Value::String(text.into()), None)
    }

    /// Texto del artifact cuando es Markdown.
    pub fn as_text(&self) -> Option<&str> {
        match self.kind {
            ArtifactKind::Markdown => self.payload.as_str(),
            ArtifactKind::Json => None,
        }
    }
}
