use crate::hashing::hash_str;
use crate::model::ArtifactKey;

use super::{StageContext, StageRunResult};

/// Trait que define una etapa del pipeline.
pub trait StageDefinition {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre del agente con el que la etapa firma sus entradas de log.
    fn agent(&self) -> &str;

    /// Nombre del estado de la corrida mientras la etapa se ejecuta.
    fn phase(&self) -> String {
        self.id().to_uppercase()
    }

    /// Línea de progreso mostrada al iniciar la etapa.
    fn description(&self) -> &str {
        ""
    }

    /// Clave bajo la cual el engine persiste el artifact de salida.
    fn artifact_key(&self) -> Option<ArtifactKey>;

    /// Ejecución de la etapa. Los fallos se devuelven como
    /// `StageRunResult::Failure`; el engine los contiene.
    fn run(&self, ctx: &mut StageContext<'_>) -> StageRunResult;

    fn definition_hash(&self) -> String {
        hash_str(&format!("{}|{}", self.id(), self.agent()))
    }
}
