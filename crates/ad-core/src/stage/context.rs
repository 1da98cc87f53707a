use serde_json::Value;
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::model::{ArtifactDecodeError, ArtifactSpec, ArtifactStore};
use crate::sink::{LogEntry, LogSink};

/// Contexto de ejecución entregado a `StageDefinition::run`.
///
/// Da acceso de sólo lectura al store de artifacts (las etapas nunca
/// escriben directamente; el engine persiste su output) y acceso de
/// escritura al sink de log.
pub struct StageContext<'a> {
    pub run_id: Uuid,
    pub query: &'a str,
    agent: &'a str,
    artifacts: &'a dyn ArtifactStore,
    sink: &'a mut dyn LogSink,
}

impl<'a> StageContext<'a> {
    pub fn new(run_id: Uuid,
               query: &'a str,
               agent: &'a str,
               artifacts: &'a dyn ArtifactStore,
               sink: &'a mut dyn LogSink)
               -> Self {
        Self { run_id,
               query,
               agent,
               artifacts,
               sink }
    }

    pub fn agent(&self) -> &str {
        self.agent
    }

    pub fn artifacts(&self) -> &dyn ArtifactStore {
        self.artifacts
    }

    /// Lee un artifact tipado. `None` si no existe en el store.
    pub fn read<T: ArtifactSpec>(&self) -> Option<Result<T, ArtifactDecodeError>> {
        self.artifacts.read(&T::key()).map(|a| T::from_artifact(&a))
    }

    /// Lee un artifact tipado que la etapa necesita para continuar.
    pub fn require<T: ArtifactSpec>(&self) -> Result<T, CoreEngineError> {
        match self.read::<T>() {
            Some(res) => res.map_err(CoreEngineError::from),
            None => Err(CoreEngineError::MissingArtifact(T::FILE_NAME.to_string())),
        }
    }

    /// Registra un paso interno y lo refleja en consola.
    pub fn log_step(&mut self, step: &str, message: impl Into<String>) {
        let message = message.into();
        println!("[{}] {}", self.agent, message);
        self.sink.append(LogEntry::step(self.agent, step, message));
    }

    /// Registra un evento con detalles arbitrarios.
    pub fn log_event(&mut self, event: &str, details: Value) {
        self.sink.append(LogEntry::event(self.agent, event, details));
    }
}
