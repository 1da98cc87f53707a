//! Cliente HTTP para la API `generateContent` de Gemini.
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::generator::{GenerationRequest, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize, Default)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ResponseContent,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_base_url(DEFAULT_BASE_URL, model, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>,
                         model: impl Into<String>,
                         api_key: impl Into<String>)
                         -> Result<Self, LlmError> {
        // Sin timeout: una llamada colgada cuelga la corrida.
        let http = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self { http,
                  base_url: base_url.into().trim_end_matches('/').to_string(),
                  model: model.into(),
                  api_key: api_key.into() })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Concatena el texto de todas las partes del primer candidato.
fn response_text(resp: GenerateResponse) -> Result<String, LlmError> {
    let candidate = resp.candidates.into_iter().next().ok_or(LlmError::EmptyResponse)?;
    let text: String = candidate.content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        log::info!("calling Gemini model {} ({:?})", self.model, request.profile);
        let body = GenerateRequest { contents: vec![Content { parts: vec![Part { text: &request.prompt }] }] };
        let resp = self.http
                       .post(self.endpoint())
                       .query(&[("key", self.api_key.as_str())])
                       .json(&body)
                       .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            log::warn!("Gemini call failed with status {status}");
            return Err(LlmError::Status { status: status.as_u16(),
                                          body });
        }
        let parsed: GenerateResponse = resp.json().map_err(|e| LlmError::Decode(e.to_string()))?;
        response_text(parsed)
    }
}
