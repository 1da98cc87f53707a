//! EvaluationStage
//!
//! Asigna `validated_confidence` y `reasoning` a cada hipótesis. La base es
//! determinista (ver `ad_domain::hypothesis::assess`); una respuesta
//! generada válida puede sobreescribir entradas por `id`. Nunca descarta ni
//! reordena hipótesis.

use std::sync::Arc;

use ad_core::{CoreEngineError, StageContext, StageRunResultTyped, TypedStage};
use ad_domain::hypothesis::assess;
use ad_domain::lenient;
use ad_domain::{DataSummary, EvaluationResults, ValidatedHypothesis};
use ad_llm::{parse_strict, GenerationRequest, ResponseProfile, TextGenerator};
use serde_json::Value;

use crate::artifacts::{DataSummaryArtifact, EvaluationArtifact, InsightsArtifact};
use crate::prompts::evaluation_prompt;

pub struct EvaluationStage {
    generator: Arc<dyn TextGenerator>,
}

impl EvaluationStage {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

/// Aplica sobre `validated` las entradas generadas cuyo `id` coincide.
/// Devuelve cuántas hipótesis se actualizaron.
pub fn apply_overrides(validated: &mut [ValidatedHypothesis], generated: &Value) -> usize {
    let Some(entries) = generated.get("validated_hypotheses").and_then(Value::as_array) else {
        return 0;
    };
    let mut applied = 0;
    for entry in entries {
        let Some(id) = entry.get("id").and_then(lenient::text) else {
            continue;
        };
        if let Some(target) = validated.iter_mut().find(|v| v.id == id) {
            let reasoning = entry.get("reasoning").and_then(lenient::text);
            let confidence = entry.get("validated_confidence").and_then(lenient::number);
            target.override_with(reasoning, confidence);
            applied += 1;
        }
    }
    applied
}

impl EvaluationStage {
    fn evaluate(&self, ctx: &mut StageContext<'_>) -> Result<EvaluationResults, CoreEngineError> {
        let insights = ctx.require::<InsightsArtifact>()?.0;
        let summary: Option<DataSummary> = match ctx.read::<DataSummaryArtifact>() {
            Some(Ok(s)) => Some(s.0),
            Some(Err(e)) => {
                log::warn!("data summary unreadable: {e}");
                None
            }
            None => None,
        };

        let mut validated: Vec<ValidatedHypothesis> =
            insights.hypotheses.iter().map(|h| assess(h, summary.as_ref())).collect();
        ctx.log_step("assess", format!("Baseline assessment for {} hypotheses.", validated.len()));

        let request = GenerationRequest::new(evaluation_prompt(&insights, summary.as_ref()), ResponseProfile::Evaluation);
        match self.generator.generate(&request) {
            Ok(text) => match parse_strict(&text) {
                Ok(value) => {
                    let n = apply_overrides(&mut validated, &value);
                    ctx.log_step("generate", format!("Applied {n} generated evaluations."));
                }
                Err(e) => ctx.log_step("generate", format!("Evaluation response unusable ({e}); keeping baseline.")),
            },
            Err(e) => ctx.log_step("generate", format!("Evaluation call failed ({e}); keeping baseline.")),
        }
        Ok(EvaluationResults { validated_hypotheses: validated })
    }
}

impl TypedStage for EvaluationStage {
    type Output = EvaluationArtifact;

    fn id(&self) -> &'static str {
        "evaluate"
    }

    fn agent(&self) -> &'static str {
        "EvaluatorAgent"
    }

    fn description(&self) -> &'static str {
        "Validating hypotheses..."
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<EvaluationArtifact> {
        self.evaluate(ctx).map(EvaluationArtifact).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_domain::Hypothesis;
    use serde_json::json;

    #[test]
    fn overrides_match_by_id_and_keep_order() {
        let hs = [Hypothesis { id: "H1".into(),
                               title: "a".into(),
                               evidence: String::new(),
                               confidence: 0.5 },
                  Hypothesis { id: "H2".into(),
                               title: "b".into(),
                               evidence: String::new(),
                               confidence: 0.6 }];
        let mut v: Vec<ValidatedHypothesis> = hs.iter().map(|h| assess(h, None)).collect();
        let generated = json!({"validated_hypotheses": [
            {"id": "H2", "reasoning": "strong", "validated_confidence": 0.9},
            {"id": "H9", "reasoning": "ghost", "validated_confidence": 0.1},
            {"reasoning": "no id"}
        ]});
        assert_eq!(apply_overrides(&mut v, &generated), 1);
        assert_eq!(v[0].id, "H1");
        assert_eq!(v[0].validated_confidence, 0.5);
        assert_eq!(v[1].reasoning, "strong");
        assert_eq!(v[1].validated_confidence, 0.9);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn numeric_ids_and_string_confidences_still_match() {
        let hs = [Hypothesis { id: "1".into(),
                               title: "a".into(),
                               evidence: String::new(),
                               confidence: 0.5 }];
        let mut v: Vec<ValidatedHypothesis> = hs.iter().map(|h| assess(h, None)).collect();
        let generated = json!({"validated_hypotheses": [{"id": 1, "reasoning": "ok", "validated_confidence": "0.7"}]});
        assert_eq!(apply_overrides(&mut v, &generated), 1);
        assert_eq!(v[0].validated_confidence, 0.7);
    }
}
