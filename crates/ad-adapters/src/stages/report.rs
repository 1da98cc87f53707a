//! ReportStage: compila `report.md` a partir de los artifacts ya
//! persistidos. No falla por artifacts faltantes.

use ad_core::{StageContext, StageRunResultTyped, TypedStage};
use chrono::Local;

use crate::artifacts::ReportArtifact;
use crate::report::compile;

#[derive(Debug, Default)]
pub struct ReportStage;

impl ReportStage {
    pub fn new() -> Self {
        Self
    }
}

impl TypedStage for ReportStage {
    type Output = ReportArtifact;

    fn id(&self) -> &'static str {
        "report"
    }

    fn agent(&self) -> &'static str {
        "ReportGenerator"
    }

    fn description(&self) -> &'static str {
        "Compiling final report..."
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<ReportArtifact> {
        let text = compile(ctx.artifacts(), Local::now());
        ctx.log_step("compile", format!("Report compiled ({} lines).", text.lines().count()));
        StageRunResultTyped::Success { output: ReportArtifact(text) }
    }
}
