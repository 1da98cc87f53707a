//! Puerto de generación de texto.
use crate::error::LlmError;

/// Perfil de respuesta esperado por quien llama.
///
/// Es la única señal que usa el generador simulado para elegir su payload;
/// el texto del prompt nunca se inspecciona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseProfile {
    Plan,
    Hypotheses,
    Evaluation,
    Creatives,
    Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub profile: ResponseProfile,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, profile: ResponseProfile) -> Self {
        Self { prompt: prompt.into(),
               profile }
    }
}

/// Llamada bloqueante, sin reintentos ni timeout.
pub trait TextGenerator {
    fn name(&self) -> &str;
    fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}
