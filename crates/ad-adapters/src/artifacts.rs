//! Artifacts tipados del pipeline.
//!
//! Cada tipo envuelve una entidad de dominio y fija el archivo bajo el que
//! se persiste. El payload es la serialización transparente de la entidad;
//! el engine calcula el hash.

use ad_core::{ArtifactKind, ArtifactSpec};
use ad_domain::{CreativeFinding, CreativeRecommendationSet, DataSummary, EvaluationResults, HypothesisSet, Plan};
use serde::{Deserialize, Serialize};

macro_rules! file_artifact {
    ($(#[$meta:meta])* $name:ident($inner:ty) => $file:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl ArtifactSpec for $name {
            const FILE_NAME: &'static str = $file;
        }
    };
}

file_artifact!(PlanArtifact(Plan) => "plan.json");
file_artifact!(DataSummaryArtifact(DataSummary) => "data_summary.json");
file_artifact!(InsightsArtifact(HypothesisSet) => "insights.json");
file_artifact!(EvaluationArtifact(EvaluationResults) => "evaluation_results.json");
file_artifact!(
    /// Salida de la etapa de creatividades (análisis + recomendaciones).
    CreativesArtifact(CreativeRecommendationSet) => "creatives.json"
);
file_artifact!(
    /// Recomendaciones publicadas por separado; el reporte las prefiere
    /// sobre `creatives.json` si existen.
    CreativeRecommendationsArtifact(CreativeRecommendationSet) => "creative_recommendations.json"
);

/// Análisis de creatividades publicado por separado.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreativeAnalysisArtifact {
    #[serde(default)]
    pub analysis: Vec<CreativeFinding>,
}

impl ArtifactSpec for CreativeAnalysisArtifact {
    const FILE_NAME: &'static str = "creative_analysis.json";
}

/// Reporte final en Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportArtifact(pub String);

impl ArtifactSpec for ReportArtifact {
    const FILE_NAME: &'static str = "report.md";
    const KIND: ArtifactKind = ArtifactKind::Markdown;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_core::ArtifactKey;

    #[test]
    fn keys_match_report_files() {
        assert_eq!(DataSummaryArtifact::key(), ArtifactKey::fixed("data_summary.json"));
        assert_eq!(ReportArtifact::key().kind(), ArtifactKind::Markdown);
        let art = ReportArtifact("# r".into()).to_artifact().expect("encode");
        assert_eq!(art.as_text(), Some("# r"));
    }

    #[test]
    fn wrappers_serialize_transparently() {
        let plan = PlanArtifact(Plan::fallback("q"));
        let art = plan.to_artifact().expect("encode");
        assert_eq!(art.payload, serde_json::json!({"objective": "q", "subtasks": []}));
        assert_eq!(PlanArtifact::from_artifact(&art).expect("decode"), plan);
    }
}
