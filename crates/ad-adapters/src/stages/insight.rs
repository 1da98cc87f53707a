//! InsightStage
//!
//! Genera hipótesis a partir de `data_summary.json`. Si la generación falla
//! o su respuesta no parsea, usa el generador simulado. Las confianzas se
//! acotan a [0, 1] y las hipótesis se ordenan por confianza.

use std::sync::Arc;

use ad_core::{CoreEngineError, StageContext, StageRunResultTyped, TypedStage};
use ad_domain::HypothesisSet;
use ad_llm::{parse_strict, GenerationRequest, ParseError, ResponseProfile, SimulatedGenerator, TextGenerator};

use crate::artifacts::{DataSummaryArtifact, InsightsArtifact};
use crate::prompts::insight_prompt;

pub struct InsightStage {
    generator: Arc<dyn TextGenerator>,
}

impl InsightStage {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

/// Exige la clave `hypotheses` con una lista.
pub fn parse_hypotheses(text: &str) -> Result<HypothesisSet, ParseError> {
    let value = parse_strict(text)?;
    if !value.get("hypotheses").is_some_and(|h| h.is_array()) {
        return Err(ParseError::Invalid("missing 'hypotheses' list".into()));
    }
    serde_json::from_value(value).map_err(|e| ParseError::Invalid(e.to_string()))
}

fn generate_with(generator: &dyn TextGenerator, request: &GenerationRequest) -> Result<HypothesisSet, String> {
    let text = generator.generate(request).map_err(|e| e.to_string())?;
    parse_hypotheses(&text).map_err(|e| e.to_string())
}

impl InsightStage {
    fn hypotheses(&self, ctx: &mut StageContext<'_>) -> Result<HypothesisSet, CoreEngineError> {
        let summary = ctx.require::<DataSummaryArtifact>()?;
        let request = GenerationRequest::new(insight_prompt(&summary.0), ResponseProfile::Hypotheses);
        let set = match generate_with(self.generator.as_ref(), &request) {
            Ok(set) => {
                ctx.log_step("generate", format!("Using hypotheses from {}.", self.generator.name()));
                set
            }
            Err(reason) => {
                ctx.log_step("generate", format!("Generation unusable ({reason}); using simulated responder."));
                generate_with(&SimulatedGenerator::new(), &request).map_err(CoreEngineError::Generation)?
            }
        };
        let set = set.normalized();
        ctx.log_step("generate", format!("{} hypotheses generated.", set.hypotheses.len()));
        Ok(set)
    }
}

impl TypedStage for InsightStage {
    type Output = InsightsArtifact;

    fn id(&self) -> &'static str {
        "hypothesize"
    }

    fn agent(&self) -> &'static str {
        "InsightAgent"
    }

    fn description(&self) -> &'static str {
        "Generating hypotheses..."
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<InsightsArtifact> {
        self.hypotheses(ctx).map(InsightsArtifact).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypotheses_key_is_required() {
        assert!(parse_hypotheses("{\"other\": []}").is_err());
        assert!(parse_hypotheses("{\"hypotheses\": \"x\"}").is_err());
        let set = parse_hypotheses("ok {\"hypotheses\": [{\"id\": \"H1\", \"title\": \"t\", \"confidence\": 0.4}]}")
            .expect("parse");
        assert_eq!(set.hypotheses[0].evidence, "");
    }

    #[test]
    fn loosely_typed_response_is_not_replaced() {
        let set = parse_hypotheses(r#"{"hypotheses":[{"id":1,"title":"Real LLM hypothesis","evidence":"e","confidence":"0.9"}]}"#)
            .expect("parse");
        assert_eq!(set.hypotheses[0].id, "1");
        assert_eq!(set.hypotheses[0].title, "Real LLM hypothesis");
        assert_eq!(set.hypotheses[0].confidence, 0.9);
    }
}
