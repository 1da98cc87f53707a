use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http transport: {0}")]
    Transport(String),
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("empty response from model")]
    EmptyResponse,
    #[error("unexpected response shape: {0}")]
    Decode(String),
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Transport(e.to_string())
    }
}

/// Fallo al extraer un objeto JSON de texto generado.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in generated text")]
    NoJsonObject,
    #[error("invalid JSON: {0}")]
    Invalid(String),
}
