//! Compilador del reporte Markdown.
//!
//! Cada sección se renderiza de forma aislada: un artifact ausente o mal
//! formado degrada sólo esa sección a un marcador explícito. Límites de
//! salida: 3 recomendaciones, 5 filas de análisis, 5 campañas de muestra.

use std::path::{Path, PathBuf};

use ad_core::{Artifact, ArtifactKey, ArtifactSpec, ArtifactStore};
use ad_domain::{CreativeFinding, CreativeRecommendationSet, DataSummary, EvaluationResults, HypothesisSet};
use ad_persistence::{FsArtifactStore, PersistenceError};
use chrono::{DateTime, Local};

use crate::artifacts::{CreativeAnalysisArtifact, CreativeRecommendationsArtifact, CreativesArtifact,
                       DataSummaryArtifact, EvaluationArtifact, InsightsArtifact, ReportArtifact};

const MAX_RECOMMENDATIONS: usize = 3;
const MAX_ANALYSIS_ROWS: usize = 5;
const MAX_SAMPLE_CAMPAIGNS: usize = 5;
const RULE: &str = "\n---\n";

pub const NO_DATA_SUMMARY: &str = "_No data summary available._";
pub const NO_HYPOTHESES: &str = "_No hypotheses available._";
pub const NO_EVALUATION: &str = "_No evaluation results available._";
pub const NO_CREATIVE_ANALYSIS: &str = "_No creative analysis results found._";
pub const NO_RECOMMENDATIONS: &str = "_No creative recommendations available._";

/// Lee y decodifica un artifact; cualquier fallo se registra y da `None`.
fn load<T: ArtifactSpec>(store: &dyn ArtifactStore) -> Option<T> {
    let artifact = store.read(&T::key())?;
    match T::from_artifact(&artifact) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("failed to decode {}: {e}", T::FILE_NAME);
            None
        }
    }
}

fn num(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn data_summary_section(summary: Option<DataSummary>) -> Vec<String> {
    let Some(s) = summary else {
        return vec![NO_DATA_SUMMARY.to_string()];
    };
    let t = &s.roas_trend;
    let low = &s.low_ctr_summary;
    let mut trend = format!("{} (start: {}, end: {}",
                            t.trend_direction.as_str(),
                            num(t.start_roas),
                            num(t.end_roas));
    if let Some(pct) = t.change_pct {
        trend.push_str(&format!(", change: {pct}%"));
    }
    trend.push(')');
    if t.significant_drop {
        trend.push_str(" **significant drop**");
    }
    let samples: Vec<&str> = low.sample_campaigns
                                .iter()
                                .take(MAX_SAMPLE_CAMPAIGNS)
                                .map(String::as_str)
                                .collect();
    vec![format!("- Dataset Rows: {}", s.dataset_rows),
         format!("- ROAS Trend: {trend}"),
         format!("- Low CTR Summary: {} campaigns, avg CTR {}, avg ROAS {}",
                 low.count,
                 num(low.avg_ctr),
                 num(low.avg_roas)),
         format!("- Sample Campaigns: {}",
                 if samples.is_empty() { "N/A".to_string() } else { samples.join(", ") }),
         format!("- Timestamp: {}", s.timestamp)]
}

fn hypotheses_section(insights: Option<HypothesisSet>) -> Vec<String> {
    match insights {
        Some(set) if !set.hypotheses.is_empty() => set.hypotheses
                                                      .iter()
                                                      .enumerate()
                                                      .flat_map(|(i, h)| {
                                                          [format!("### {}. {}", i + 1, h.title),
                                                           format!("- Evidence: {}", h.evidence),
                                                           format!("- Confidence: {}\n", h.confidence)]
                                                      })
                                                      .collect(),
        _ => vec![NO_HYPOTHESES.to_string()],
    }
}

fn evaluation_section(evaluation: Option<EvaluationResults>) -> Vec<String> {
    match evaluation {
        Some(ev) if !ev.validated_hypotheses.is_empty() => ev.validated_hypotheses
                                                             .iter()
                                                             .enumerate()
                                                             .flat_map(|(i, h)| {
                                                                 [format!("### {}. {}", i + 1, h.title),
                                                                  format!("- Reasoning: {}", h.reasoning),
                                                                  format!("- Validated Confidence: {}\n",
                                                                          h.validated_confidence)]
                                                             })
                                                             .collect(),
        _ => vec![NO_EVALUATION.to_string()],
    }
}

fn analysis_section(analysis: Option<Vec<CreativeFinding>>) -> Vec<String> {
    let Some(rows) = analysis else {
        return vec![NO_CREATIVE_ANALYSIS.to_string()];
    };
    let mut out = vec![format!("- Underperforming Creatives Found: {}\n", rows.len())];
    out.extend(rows.iter().take(MAX_ANALYSIS_ROWS).map(|c| {
                                                       format!("  - Creative ID: {}, CTR: {}, ROAS: {}",
                                                               c.creative_id,
                                                               num(c.ctr),
                                                               num(c.roas))
                                                   }));
    out
}

fn recommendations_section(set: Option<CreativeRecommendationSet>) -> Vec<String> {
    let Some(set) = set.filter(|s| !s.creative_recommendations.is_empty()) else {
        return vec![NO_RECOMMENDATIONS.to_string()];
    };
    let mut out = Vec::new();
    for rec in set.creative_recommendations.iter().take(MAX_RECOMMENDATIONS) {
        out.push(format!("### Creative ID: {} ({})", rec.creative_id, rec.campaign_name));
        out.push(format!("- Identified Issue: {}", rec.identified_issue));
        for r in &rec.recommendations {
            out.push(format!("  - Type: {}", r.kind));
            for (label, field) in r.labeled_fields() {
                out.push(format!("    - {label}: {}", r.field(field).unwrap_or_else(|| "N/A".to_string())));
            }
            out.push(format!("    - Rationale: {}\n", r.rationale.as_deref().unwrap_or("N/A")));
        }
    }
    out
}

/// Compila el reporte leyendo cada artifact del store.
pub fn compile(store: &dyn ArtifactStore, generated_on: DateTime<Local>) -> String {
    let creatives = load::<CreativesArtifact>(store).map(|c| c.0);
    let analysis = load::<CreativeAnalysisArtifact>(store).map(|a| a.analysis)
                                                          .or_else(|| creatives.as_ref().map(|c| c.analysis.clone()));
    let recommendations = load::<CreativeRecommendationsArtifact>(store).map(|r| r.0)
                                                                        .filter(|r| !r.creative_recommendations.is_empty())
                                                                        .or(creatives);

    let mut md = vec!["# Ad Performance Diagnostic Report".to_string(),
                      format!("**Generated on:** {}", generated_on.format("%Y-%m-%d %H:%M:%S")),
                      RULE.to_string()];

    let sections: [(&str, Vec<String>); 5] =
        [("## 1. Data Summary\n", data_summary_section(load::<DataSummaryArtifact>(store).map(|d| d.0))),
         ("## 2. Generated Hypotheses\n", hypotheses_section(load::<InsightsArtifact>(store).map(|i| i.0))),
         ("## 3. Hypothesis Evaluation Results\n",
          evaluation_section(load::<EvaluationArtifact>(store).map(|e| e.0))),
         ("## 4. Creative Performance Analysis\n", analysis_section(analysis)),
         ("## 5. Creative Recommendations\n", recommendations_section(recommendations))];

    for (heading, body) in sections {
        md.push(heading.to_string());
        md.extend(body);
        md.push(RULE.to_string());
    }
    md.push("**End of Report**".to_string());
    md.join("\n")
}

/// Compila desde un directorio de reportes y escribe `report.md` en él.
pub fn compile_dir(reports_dir: impl AsRef<Path>) -> Result<PathBuf, PersistenceError> {
    let store = FsArtifactStore::open(reports_dir.as_ref())?;
    let text = compile(&store, Local::now());
    let artifact = Artifact::markdown(text);
    store.write_artifact(&ArtifactKey::fixed(ReportArtifact::FILE_NAME), &artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_core::InMemoryArtifactStore;
    use ad_domain::{CreativeRecommendation, Recommendation};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid time")
    }

    fn put<T: ArtifactSpec>(store: &mut InMemoryArtifactStore, value: &T) {
        store.write(&T::key(), &value.to_artifact().expect("encode")).expect("write");
    }

    #[test]
    fn empty_store_renders_all_placeholders() {
        let md = compile(&InMemoryArtifactStore::new(), fixed_now());
        for p in [NO_DATA_SUMMARY, NO_HYPOTHESES, NO_EVALUATION, NO_CREATIVE_ANALYSIS, NO_RECOMMENDATIONS] {
            assert!(md.contains(p), "missing placeholder {p}");
        }
        assert!(md.contains("**Generated on:** 2024-05-01 12:00:00"));
        assert!(md.ends_with("**End of Report**"));
    }

    #[test]
    fn recommendations_are_capped_and_typed() {
        let rec = |id: &str| CreativeRecommendation { creative_id: id.into(),
                                                      campaign_name: "Camp".into(),
                                                      identified_issue: "Low engagement".into(),
                                                      recommendations: vec![Recommendation::new("Ad Copy",
                                                                                                "hook",
                                                                                                &[("headline", "H"),
                                                                                                  ("cta", "Buy")])] };
        let set = CreativeRecommendationSet { timestamp: "t".into(),
                                              analysis: vec![],
                                              creative_recommendations: (1..=5).map(|i| rec(&format!("C{i}")))
                                                                               .collect(),
                                              raw_output: String::new() };
        let mut store = InMemoryArtifactStore::new();
        put(&mut store, &CreativesArtifact(set));
        let md = compile(&store, fixed_now());
        assert!(md.contains("### Creative ID: C3 (Camp)"));
        assert!(!md.contains("C4"));
        assert!(md.contains("    - Headline: H"));
        assert!(md.contains("    - Primary Text: N/A"));
        assert!(md.contains("    - CTA: Buy"));
        assert!(md.contains("    - Rationale: hook"));
        assert!(md.contains("- Underperforming Creatives Found: 0"));
    }

    #[test]
    fn separate_analysis_file_wins_over_creatives() {
        let finding = |id: &str| CreativeFinding { creative_id: id.into(),
                                                   campaign_name: "c".into(),
                                                   ctr: Some(0.3),
                                                   roas: None,
                                                   spend: 0.0,
                                                   identified_issue: "x".into() };
        let mut store = InMemoryArtifactStore::new();
        put(&mut store,
            &CreativeAnalysisArtifact { analysis: (0..7).map(|i| finding(&format!("A{i}"))).collect() });
        let md = compile(&store, fixed_now());
        assert!(md.contains("- Underperforming Creatives Found: 7"));
        assert!(md.contains("  - Creative ID: A4, CTR: 0.3, ROAS: N/A"));
        assert!(!md.contains("A5"));
    }

    #[test]
    fn malformed_artifact_degrades_only_its_section() {
        let mut store = InMemoryArtifactStore::new();
        store.write(&ArtifactKey::fixed("insights.json"),
                    &Artifact::json(serde_json::json!({"hypotheses": "not a list"})))
             .expect("write");
        put(&mut store,
            &EvaluationArtifact(EvaluationResults { validated_hypotheses: vec![ad_domain::ValidatedHypothesis {
                id: "H1".into(),
                title: "Fatigue".into(),
                evidence: String::new(),
                confidence: 0.8,
                reasoning: "ok".into(),
                validated_confidence: 0.85,
            }] }));
        let md = compile(&store, fixed_now());
        assert!(md.contains(NO_HYPOTHESES));
        assert!(md.contains("### 1. Fatigue"));
        assert!(md.contains("- Validated Confidence: 0.85"));
    }
}
