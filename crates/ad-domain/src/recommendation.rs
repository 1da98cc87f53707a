//! Recomendaciones de creatividades.
//!
//! Cada recomendación lleva un `type` y un `rationale`; el resto de campos
//! depende del tipo (`Ad Copy`, `Visual Concept`, `Targeting`) y se
//! conservan en orden tal como llegaron.
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::creative::CreativeFinding;
use crate::lenient;

pub const AD_COPY: &str = "Ad Copy";
pub const VISUAL_CONCEPT: &str = "Visual Concept";
pub const TARGETING: &str = "Targeting";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type", default = "general", deserialize_with = "kind_or_general")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

fn general() -> String {
    "General".to_string()
}

fn kind_or_general<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::opt_string(d)?.unwrap_or_else(general))
}

impl Recommendation {
    pub fn new(kind: &str, rationale: &str, fields: &[(&str, &str)]) -> Self {
        Self { kind: kind.to_string(),
               rationale: Some(rationale.to_string()),
               fields: fields.iter()
                             .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                             .collect() }
    }

    /// Campo específico del tipo como texto.
    pub fn field(&self, name: &str) -> Option<String> {
        lenient::text(self.fields.get(name)?)
    }

    /// Pares (etiqueta, campo) que se muestran según el tipo.
    pub fn labeled_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self.kind.as_str() {
            AD_COPY => &[("Headline", "headline"), ("Primary Text", "primary_text"), ("CTA", "cta")],
            VISUAL_CONCEPT => &[("Theme", "theme"), ("Description", "description")],
            TARGETING => &[("Suggestion", "suggestion")],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeRecommendation {
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub creative_id: String,
    #[serde(default = "unknown_campaign", deserialize_with = "text_or_unknown_campaign")]
    pub campaign_name: String,
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub identified_issue: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

fn not_available() -> String {
    "N/A".to_string()
}
fn unknown_campaign() -> String {
    "Unknown Campaign".to_string()
}

fn text_or_not_available<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::opt_string(d)?.unwrap_or_else(not_available))
}

fn text_or_unknown_campaign<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::opt_string(d)?.unwrap_or_else(unknown_campaign))
}

/// Resultado de la etapa de creatividades.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreativeRecommendationSet {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub analysis: Vec<CreativeFinding>,
    #[serde(default)]
    pub creative_recommendations: Vec<CreativeRecommendation>,
    /// Texto original de la generación, siempre conservado.
    #[serde(default)]
    pub raw_output: String,
}

/// Decodifica la lista `creative_recommendations` de un objeto generado,
/// descartando entradas que no tienen forma de recomendación.
pub fn recommendations_from_value(parsed: &Value) -> Vec<CreativeRecommendation> {
    let Some(items) = parsed.get("creative_recommendations").and_then(Value::as_array) else {
        return Vec::new();
    };
    items.iter()
         .filter_map(|item| match serde_json::from_value::<CreativeRecommendation>(item.clone()) {
             Ok(r) => Some(r),
             Err(e) => {
                 log::warn!("discarding malformed creative recommendation: {e}");
                 None
             }
         })
         .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_specific_fields_keep_their_order() {
        let v = json!({"type": "Ad Copy", "headline": "Comfort all day", "primary_text": "Soft.", "cta": "Shop Now", "rationale": "r"});
        let rec: Recommendation = serde_json::from_value(v).expect("decode");
        assert_eq!(rec.kind, AD_COPY);
        assert_eq!(rec.field("cta").as_deref(), Some("Shop Now"));
        assert_eq!(rec.fields.keys().collect::<Vec<_>>(), vec!["headline", "primary_text", "cta"]);
        assert_eq!(rec.labeled_fields().len(), 3);
        let back = serde_json::to_value(&rec).expect("encode");
        let again: Recommendation = serde_json::from_value(back).expect("decode again");
        assert_eq!(again, rec);
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let parsed = json!({"creative_recommendations": [
            {"creative_id": "A1", "recommendations": [{"type": "Targeting", "suggestion": "25-34"}]},
            "not an object",
            {"creative_id": "A2", "recommendations": "oops"}
        ]});
        let recs = recommendations_from_value(&parsed);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].campaign_name, "Unknown Campaign");
        assert_eq!(recs[0].recommendations[0].rationale, None);
        assert!(recommendations_from_value(&json!({"other": 1})).is_empty());
    }

    #[test]
    fn non_string_ids_and_rationales_are_kept_as_text() {
        let parsed = json!({"creative_recommendations": [
            {"creative_id": 101, "campaign_name": null, "identified_issue": "Low CTR",
             "recommendations": [{"type": "Targeting", "suggestion": "25-34", "rationale": "r"}]},
            {"creative_id": "A2",
             "recommendations": [{"type": "Ad Copy", "headline": "H", "rationale": {"why": "x"}},
                                 {"type": 7, "cta": 3}]}
        ]});
        let recs = recommendations_from_value(&parsed);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].creative_id, "101");
        assert_eq!(recs[0].campaign_name, "Unknown Campaign");
        assert_eq!(recs[0].recommendations[0].rationale.as_deref(), Some("r"));
        assert_eq!(recs[1].recommendations[0].rationale.as_deref(), Some(r#"{"why":"x"}"#));
        assert_eq!(recs[1].recommendations[1].kind, "7");
        assert_eq!(recs[1].recommendations[1].field("cta").as_deref(), Some("3"));
    }
}
