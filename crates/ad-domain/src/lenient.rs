//! Decodificación tolerante de campos generados.
//!
//! Los modelos devuelven a veces números donde se espera texto (`"id": 1`)
//! o texto donde se espera un número (`"confidence": "0.8"`). Estos
//! helpers aceptan cualquier valor JSON y lo convierten en vez de rechazar
//! la entrada completa.
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Texto de un valor: strings tal cual, `null` como ausente, el resto como
/// su JSON compacto.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Número de un valor; acepta strings numéricos. Cualquier otra cosa es
/// `None`.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where D: Deserializer<'de>
{
    Ok(text(&Value::deserialize(d)?))
}

/// `null` queda como string vacío.
pub fn string<'de, D>(d: D) -> Result<String, D::Error>
    where D: Deserializer<'de>
{
    Ok(opt_string(d)?.unwrap_or_default())
}

/// Valores no numéricos cuentan como 0.
pub fn float<'de, D>(d: D) -> Result<f64, D::Error>
    where D: Deserializer<'de>
{
    Ok(number(&Value::deserialize(d)?).unwrap_or(0.0))
}
