//! SummarizeStage
//!
//! Carga el dataset y produce `data_summary.json`. Sin datos utilizables la
//! etapa falla y la corrida se detiene.

use std::path::PathBuf;

use ad_core::{CoreEngineError, StageContext, StageRunResultTyped, TypedStage};
use ad_domain::{load_dataset, summarize, DataSummary, Thresholds};

use crate::artifacts::DataSummaryArtifact;

pub struct SummarizeStage {
    data_path: PathBuf,
    thresholds: Thresholds,
}

impl SummarizeStage {
    pub fn new(data_path: impl Into<PathBuf>, thresholds: Thresholds) -> Self {
        Self { data_path: data_path.into(),
               thresholds }
    }

    fn summarize(&self, ctx: &mut StageContext<'_>) -> Result<DataSummary, CoreEngineError> {
        let dataset = load_dataset(&self.data_path).map_err(|e| {
                                                        ctx.log_step("load", format!("Error: {e}"));
                                                        CoreEngineError::NoUsableData(e.to_string())
                                                    })?;
        ctx.log_step("load",
                     format!("Dataset loaded successfully: {} rows, {} columns.",
                             dataset.len(),
                             dataset.columns.len()));
        let summary = summarize(&dataset, &self.thresholds).map_err(|e| {
                                                               ctx.log_step("summarize", format!("Error: {e}"));
                                                               CoreEngineError::NoUsableData(e.to_string())
                                                           })?;
        ctx.log_step("summarize", "Data summary generated successfully.");
        println!(" - Total rows: {}", summary.dataset_rows);
        println!(" - ROAS trend: {}", summary.roas_trend.trend_direction.as_str());
        println!(" - Low CTR campaigns: {}", summary.low_ctr_summary.count);
        Ok(summary)
    }
}

impl TypedStage for SummarizeStage {
    type Output = DataSummaryArtifact;

    fn id(&self) -> &'static str {
        "summarize"
    }

    fn agent(&self) -> &'static str {
        "DataAgent"
    }

    fn description(&self) -> &'static str {
        "Summarizing dataset..."
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<DataSummaryArtifact> {
        self.summarize(ctx).map(DataSummaryArtifact).into()
    }
}
