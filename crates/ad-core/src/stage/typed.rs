//! Interfaz de alto nivel para etapas con output fuertemente tipado.
//!
//! Los implementadores escriben `run_typed` con tipos concretos; el
//! adaptador de abajo convierte esa ejecución a la interfaz neutra
//! `StageDefinition` que consume el engine.

use super::{StageContext, StageDefinition, StageRunResult};
use crate::errors::CoreEngineError;
use crate::model::{ArtifactKey, ArtifactSpec};

/// Resultado tipado de ejecutar un `TypedStage`.
pub enum StageRunResultTyped<Out: ArtifactSpec> {
    Success { output: Out },
    Failure { error: CoreEngineError },
}

impl<Out: ArtifactSpec> StageRunResultTyped<Out> {
    /// Convierte a `StageRunResult` neutro serializando el output.
    pub fn into_neutral(self) -> StageRunResult {
        match self {
            StageRunResultTyped::Success { output } => match output.to_artifact() {
                Ok(artifact) => StageRunResult::Success { artifact: Some(artifact) },
                Err(e) => StageRunResult::Failure { error: e.into() },
            },
            StageRunResultTyped::Failure { error } => StageRunResult::Failure { error },
        }
    }
}

impl<Out: ArtifactSpec> From<Result<Out, CoreEngineError>> for StageRunResultTyped<Out> {
    fn from(res: Result<Out, CoreEngineError>) -> Self {
        match res {
            Ok(output) => StageRunResultTyped::Success { output },
            Err(error) => StageRunResultTyped::Failure { error },
        }
    }
}

pub trait TypedStage {
    /// Tipo concreto producido como output (persistido bajo `Output::key()`).
    type Output: ArtifactSpec;

    fn id(&self) -> &'static str;

    fn agent(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<Self::Output>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStage` implementa `StageDefinition` neutro.
// -------------------------------------------------------------
impl<T> StageDefinition for T where T: TypedStage + 'static
{
    fn id(&self) -> &str {
        <Self as TypedStage>::id(self)
    }

    fn agent(&self) -> &str {
        <Self as TypedStage>::agent(self)
    }

    fn description(&self) -> &str {
        <Self as TypedStage>::description(self)
    }

    fn artifact_key(&self) -> Option<ArtifactKey> {
        Some(<T::Output as ArtifactSpec>::key())
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> StageRunResult {
        self.run_typed(ctx).into_neutral()
    }

    fn definition_hash(&self) -> String {
        crate::hashing::hash_str(&format!("{}|{}|{}",
                                          <Self as TypedStage>::id(self),
                                          <T::Output as ArtifactSpec>::FILE_NAME,
                                          std::any::type_name::<T>()))
    }
}
