use ad_core::CoreEngineError;
use ad_llm::LlmError;
use ad_persistence::PersistenceError;
use thiserror::Error;

use super::ConfigError;

/// Errores de preparación que llegan al proceso (exit code 1).
/// Los fallos de etapa nunca se convierten en `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("environment setup failed: {0}")]
    Setup(#[from] PersistenceError),
    #[error("generator setup failed: {0}")]
    Generator(#[from] LlmError),
    #[error("engine error: {0}")]
    Engine(#[from] CoreEngineError),
    #[error("Usage: adflow \"<query>\"")]
    Usage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert() {
        let err: AppError = ConfigError::Invalid("x".into()).into();
        assert_eq!(err.to_string(), "configuration error: invalid config: x");
    }

    #[test]
    fn engine_errors_convert() {
        let err: AppError = CoreEngineError::EmptyPipeline.into();
        assert_eq!(err.to_string(), "engine error: pipeline has no stages configured");
    }
}
