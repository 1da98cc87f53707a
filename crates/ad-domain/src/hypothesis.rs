//! Hipótesis generadas y su validación contra el resumen de datos.
use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient;
use crate::summary::{DataSummary, TrendDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default = "untitled", deserialize_with = "text_or_untitled")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub evidence: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub confidence: f64,
}

fn untitled() -> String {
    "Untitled Hypothesis".to_string()
}

fn text_or_untitled<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::opt_string(d)?.unwrap_or_else(untitled))
}

pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HypothesisSet {
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
}

impl HypothesisSet {
    /// Lleva las confianzas a [0, 1], completa ids vacíos (`H<n>`) y ordena
    /// por confianza descendente (estable).
    pub fn normalized(mut self) -> Self {
        for (i, h) in self.hypotheses.iter_mut().enumerate() {
            h.confidence = clamp_unit(h.confidence);
            if h.id.trim().is_empty() {
                h.id = format!("H{}", i + 1);
            }
        }
        self.hypotheses.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedHypothesis {
    #[serde(default)]
    pub id: String,
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub validated_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResults {
    #[serde(default)]
    pub validated_hypotheses: Vec<ValidatedHypothesis>,
}

const ENGAGEMENT_TERMS: [&str; 5] = ["ctr", "engagement", "fatigue", "click", "creative"];

/// Evaluación determinista de una hipótesis contra el resumen de datos.
///
/// Parte de la confianza original; la tendencia de ROAS suma o resta, una
/// caída significativa suma, y un segmento de CTR bajo respalda hipótesis
/// de engagement. Resultado acotado a [0, 1] y redondeado a 2 decimales.
pub fn assess(h: &Hypothesis, summary: Option<&DataSummary>) -> ValidatedHypothesis {
    let mut score = clamp_unit(h.confidence);
    let mut reasons: Vec<String> = Vec::new();

    match summary {
        None => reasons.push("No data summary available; confidence kept as generated.".to_string()),
        Some(s) => {
            match s.roas_trend.trend_direction {
                TrendDirection::Decline => {
                    score += 0.05;
                    reasons.push("ROAS declined over the period, consistent with a performance problem.".to_string());
                }
                TrendDirection::Growth => {
                    score -= 0.1;
                    reasons.push("ROAS did not decline over the period, weakening the hypothesis.".to_string());
                }
                TrendDirection::Unknown => reasons.push("ROAS trend could not be determined.".to_string()),
            }
            if s.roas_trend.significant_drop {
                score += 0.05;
                if let Some(pct) = s.roas_trend.change_pct {
                    reasons.push(format!("The drop of {:.1}% exceeds the significance threshold.", pct.abs()));
                }
            }
            let text = format!("{} {}", h.title, h.evidence).to_lowercase();
            if s.low_ctr_summary.count > 0 && ENGAGEMENT_TERMS.iter().any(|t| text.contains(t)) {
                score += 0.05;
                reasons.push(format!("{} campaigns show low CTR, supporting an engagement issue.",
                                     s.low_ctr_summary.count));
            }
        }
    }

    ValidatedHypothesis { id: h.id.clone(),
                          title: h.title.clone(),
                          evidence: h.evidence.clone(),
                          confidence: h.confidence,
                          reasoning: reasons.join(" "),
                          validated_confidence: round2(clamp_unit(score)) }
}

impl ValidatedHypothesis {
    /// Aplica una evaluación externa. Sólo reasoning y confianza cambian.
    pub fn override_with(&mut self, reasoning: Option<String>, validated_confidence: Option<f64>) {
        if let Some(r) = reasoning.filter(|r| !r.trim().is_empty()) {
            self.reasoning = r;
        }
        if let Some(c) = validated_confidence {
            self.validated_confidence = round2(clamp_unit(c));
        }
    }
}
