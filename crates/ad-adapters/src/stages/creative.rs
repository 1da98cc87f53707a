//! CreativeStage
//!
//! Detecta filas con bajo rendimiento, les asigna un diagnóstico y pide
//! recomendaciones en una sola llamada de generación. La respuesta pasa por
//! la recuperación en tres niveles; `raw_output` conserva siempre el texto
//! original. Sin hallazgos no hay llamada.

use std::path::PathBuf;
use std::sync::Arc;

use ad_core::{CoreEngineError, StageContext, StageRunResultTyped, TypedStage};
use ad_domain::recommendation::recommendations_from_value;
use ad_domain::{find_underperformers, load_dataset, CreativeFinding, CreativeRecommendationSet, Thresholds};
use ad_llm::{recover, GenerationRequest, Recovery, ResponseProfile, TextGenerator};
use chrono::Local;
use serde_json::{json, Value};

use crate::artifacts::{CreativesArtifact, InsightsArtifact};
use crate::prompts::{creative_prompt, load_template};

pub struct CreativeStage {
    generator: Arc<dyn TextGenerator>,
    data_path: PathBuf,
    template_path: PathBuf,
    thresholds: Thresholds,
}

impl CreativeStage {
    pub fn new(generator: Arc<dyn TextGenerator>,
               data_path: impl Into<PathBuf>,
               template_path: impl Into<PathBuf>,
               thresholds: Thresholds)
               -> Self {
        Self { generator,
               data_path: data_path.into(),
               template_path: template_path.into(),
               thresholds }
    }

    fn analyze(&self, ctx: &mut StageContext<'_>) -> Result<Vec<CreativeFinding>, CoreEngineError> {
        ctx.log_step("load", "Loading ad performance data.");
        let dataset = load_dataset(&self.data_path).map_err(|e| {
                                                        ctx.log_step("load", format!("Error loading data: {e}"));
                                                        CoreEngineError::NoUsableData(e.to_string())
                                                    })?;
        ctx.log_step("load", format!("Data loaded successfully ({} rows).", dataset.len()));

        ctx.log_step("analyze", "Analyzing underperforming creatives.");
        let findings = find_underperformers(&dataset, &self.thresholds);
        ctx.log_step("analyze", format!("Detected {} underperforming creatives.", findings.len()));
        Ok(findings)
    }

    fn recommend(&self,
                 ctx: &mut StageContext<'_>,
                 findings: Vec<CreativeFinding>)
                 -> Result<CreativeRecommendationSet, CoreEngineError> {
        ctx.log_step("generate", "Generating creative improvement suggestions.");
        let timestamp = Local::now().to_rfc3339();
        if findings.is_empty() {
            ctx.log_step("generate", "No underperforming creatives; skipping generation.");
            return Ok(CreativeRecommendationSet { timestamp,
                                                  analysis: findings,
                                                  creative_recommendations: Vec::new(),
                                                  raw_output: String::new() });
        }

        let insights: Value = match ctx.read::<InsightsArtifact>() {
            Some(Ok(i)) => serde_json::to_value(&i.0).unwrap_or_else(|_| json!({})),
            Some(Err(e)) => {
                log::warn!("could not load insights: {e}");
                json!({})
            }
            None => json!({}),
        };
        let template = load_template(&self.template_path).map_err(|e| {
                                                             ctx.log_step("generate", e.clone());
                                                             CoreEngineError::Io(e)
                                                         })?;

        let request = GenerationRequest::new(creative_prompt(&findings, &insights, &template), ResponseProfile::Creatives);
        let text = self.generator.generate(&request).map_err(|e| {
                                                         ctx.log_step("generate",
                                                                      format!("Error generating creative recommendations: {e}"));
                                                         CoreEngineError::Generation(e.to_string())
                                                     })?;

        let recovery = recover(&text);
        let creative_recommendations = match &recovery {
            Recovery::Strict(v) => recommendations_from_value(v),
            Recovery::Normalized(v) => {
                ctx.log_step("generate", "Partial JSON detected, recovered after normalization.");
                recommendations_from_value(v)
            }
            Recovery::Fallback { .. } => {
                ctx.log_step("generate", "Fallback parsing failed; returning raw output.");
                Vec::new()
            }
        };
        ctx.log_event("parsed", json!({"tier": recovery.tier(), "recommendations": creative_recommendations.len()}));

        Ok(CreativeRecommendationSet { timestamp,
                                       analysis: findings,
                                       creative_recommendations,
                                       raw_output: text })
    }
}

impl TypedStage for CreativeStage {
    type Output = CreativesArtifact;

    fn id(&self) -> &'static str {
        "diagnose_creative"
    }

    fn agent(&self) -> &'static str {
        "CreativeAgent"
    }

    fn description(&self) -> &'static str {
        "Analyzing and generating creative recommendations..."
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<CreativesArtifact> {
        self.analyze(ctx)
            .and_then(|findings| self.recommend(ctx, findings))
            .map(CreativesArtifact)
            .into()
    }
}
