//! Ensamblado del pipeline estándar de seis etapas.

use std::path::PathBuf;
use std::sync::Arc;

use ad_core::{ArtifactStore, EventStore, LogSink, PipelineBuilder, StageDefinition};
use ad_domain::Thresholds;
use ad_llm::TextGenerator;

use crate::prompts::{CREATIVE_TEMPLATE, PLANNER_TEMPLATE};
use crate::stages::{CreativeStage, EvaluationStage, InsightStage, PlannerStage, ReportStage, SummarizeStage};

/// Rutas y umbrales que las etapas necesitan.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub data_path: PathBuf,
    pub prompts_dir: PathBuf,
    pub thresholds: Thresholds,
}

impl PipelineSettings {
    pub fn new(data_path: impl Into<PathBuf>, prompts_dir: impl Into<PathBuf>, thresholds: Thresholds) -> Self {
        Self { data_path: data_path.into(),
               prompts_dir: prompts_dir.into(),
               thresholds }
    }
}

/// Etapas en orden: plan, summarize, hypothesize, evaluate,
/// diagnose_creative, report. Todas comparten el mismo generador.
pub fn standard_stages(settings: &PipelineSettings, generator: Arc<dyn TextGenerator>) -> Vec<Box<dyn StageDefinition>> {
    vec![Box::new(PlannerStage::new(generator.clone(), settings.prompts_dir.join(PLANNER_TEMPLATE))),
         Box::new(SummarizeStage::new(settings.data_path.clone(), settings.thresholds)),
         Box::new(InsightStage::new(generator.clone())),
         Box::new(EvaluationStage::new(generator.clone())),
         Box::new(CreativeStage::new(generator,
                                     settings.data_path.clone(),
                                     settings.prompts_dir.join(CREATIVE_TEMPLATE),
                                     settings.thresholds)),
         Box::new(ReportStage::new())]
}

/// Añade las etapas estándar a un builder.
pub fn build_pipeline<E, A, S>(builder: PipelineBuilder<E, A, S>,
                               settings: &PipelineSettings,
                               generator: Arc<dyn TextGenerator>)
                               -> PipelineBuilder<E, A, S>
    where E: EventStore,
          A: ArtifactStore,
          S: LogSink
{
    standard_stages(settings, generator).into_iter()
                                        .fold(builder, |b, stage| b.boxed_stage(stage))
}
