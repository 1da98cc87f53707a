//! Parsing tolerante de respuestas generadas.
//!
//! El texto generado puede traer prosa, fences de Markdown o JSON mal
//! formado. El objeto se ubica entre la primera `{` y la última `}`.
//! `recover` aplica tres niveles: parse estricto, reintento sobre texto
//! normalizado (saltos de línea a espacios, comillas simples a dobles) y,
//! si todo falla, un valor por defecto que conserva el texto original.
//! La sustitución de comillas puede corromper apóstrofes legítimos.
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ParseError;

/// Substring entre la primera `{` y la última `}` (inclusive), recortado.
/// `None` si no hay par o el segmento queda vacío.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let segment = text[start..=end].trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

/// Extrae y parsea el objeto JSON sin ninguna corrección.
pub fn parse_strict(text: &str) -> Result<Value, ParseError> {
    let segment = extract_json_object(text).ok_or(ParseError::NoJsonObject)?;
    serde_json::from_str(segment).map_err(|e| ParseError::Invalid(e.to_string()))
}

/// Igual que `parse_strict` pero decodificando a un tipo concreto.
pub fn parse_strict_as<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let value = parse_strict(text)?;
    serde_json::from_value(value).map_err(|e| ParseError::Invalid(e.to_string()))
}

pub fn normalize(text: &str) -> String {
    text.replace('\n', " ").replace('\'', "\"")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// El texto parseó tal cual.
    Strict(Value),
    /// Parseó tras normalizar.
    Normalized(Value),
    /// Nada parseó; se devuelve el texto original.
    Fallback { raw: String },
}

impl Recovery {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Recovery::Strict(v) | Recovery::Normalized(v) => Some(v),
            Recovery::Fallback { .. } => None,
        }
    }

    pub fn tier(&self) -> &'static str {
        match self {
            Recovery::Strict(_) => "strict",
            Recovery::Normalized(_) => "normalized",
            Recovery::Fallback { .. } => "fallback",
        }
    }
}

/// Recuperación en tres niveles. Nunca falla.
///
/// Sin segmento `{...}` se pasa directo al valor por defecto; sólo un JSON
/// inválido dispara el reintento normalizado.
pub fn recover(text: &str) -> Recovery {
    match parse_strict(text) {
        Ok(v) => Recovery::Strict(v),
        Err(ParseError::NoJsonObject) => {
            log::warn!("no JSON object in generated text; keeping raw output");
            Recovery::Fallback { raw: text.to_string() }
        }
        Err(ParseError::Invalid(e)) => {
            log::warn!("partial JSON detected ({e}); retrying on normalized text");
            match parse_strict(&normalize(text)) {
                Ok(v) => Recovery::Normalized(v),
                Err(e) => {
                    log::warn!("normalized parse failed ({e}); keeping raw output");
                    Recovery::Fallback { raw: text.to_string() }
                }
            }
        }
    }
}
