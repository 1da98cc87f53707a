//! Diagnóstico de creatividades con bajo rendimiento.
use serde::{Deserialize, Serialize};

use crate::record::Dataset;
use crate::summary::Thresholds;

/// Umbral de CTR por debajo del cual el problema es de engagement.
pub const ENGAGEMENT_CTR: f64 = 0.5;
/// Umbral de ROAS por debajo del cual el problema es de conversión.
pub const CONVERSION_ROAS: f64 = 1.2;

/// Clase de problema detectado. La primera regla que aplica gana.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueClass {
    LowEngagement,
    LowConversion,
    Moderate,
}

impl IssueClass {
    pub fn classify(ctr: Option<f64>, roas: Option<f64>) -> Self {
        if ctr.is_some_and(|c| c < ENGAGEMENT_CTR) {
            IssueClass::LowEngagement
        } else if roas.is_some_and(|r| r < CONVERSION_ROAS) {
            IssueClass::LowConversion
        } else {
            IssueClass::Moderate
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueClass::LowEngagement => "Low engagement: possible ad fatigue or weak copy.",
            IssueClass::LowConversion => "Low conversion: possible targeting or offer mismatch.",
            IssueClass::Moderate => "Moderate performance: requires further testing.",
        }
    }
}

/// Una fila con bajo rendimiento y su diagnóstico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeFinding {
    pub creative_id: String,
    #[serde(default = "unknown_campaign")]
    pub campaign_name: String,
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub roas: Option<f64>,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub identified_issue: String,
}

fn unknown_campaign() -> String {
    "Unknown".to_string()
}

/// Filas con `ctr < low_ctr` o `roas < low_roas`. Una celda sin valor no
/// dispara la regla.
pub fn find_underperformers(dataset: &Dataset, thresholds: &Thresholds) -> Vec<CreativeFinding> {
    dataset.records
           .iter()
           .enumerate()
           .filter(|(_, r)| {
               r.ctr.is_some_and(|c| c < thresholds.low_ctr) || r.roas.is_some_and(|v| v < thresholds.low_roas)
           })
           .map(|(idx, r)| CreativeFinding { creative_id: r.id.clone().unwrap_or_else(|| format!("CR-{idx}")),
                                             campaign_name: r.campaign_name.clone().unwrap_or_else(unknown_campaign),
                                             ctr: r.ctr,
                                             roas: r.roas,
                                             spend: r.spend.unwrap_or(0.0),
                                             identified_issue: IssueClass::classify(r.ctr, r.roas).label().to_string() })
           .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AdRecord;

    fn rec(ctr: Option<f64>, roas: Option<f64>) -> AdRecord {
        AdRecord { ctr, roas, ..AdRecord::default() }
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(IssueClass::classify(Some(0.3), Some(1.0)), IssueClass::LowEngagement);
        assert_eq!(IssueClass::classify(Some(0.6), Some(1.0)), IssueClass::LowConversion);
        assert_eq!(IssueClass::classify(Some(0.6), Some(1.3)), IssueClass::Moderate);
        assert_eq!(IssueClass::classify(None, Some(1.0)), IssueClass::LowConversion);
    }

    #[test]
    fn single_underperformer_scenario() {
        let ds = Dataset::from_records(vec![rec(Some(0.3), Some(1.0)), rec(Some(0.9), Some(2.0))]);
        let th = Thresholds { low_ctr: 0.7,
                              low_roas: 1.5,
                              ..Thresholds::default() };
        let found = find_underperformers(&ds, &th);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].creative_id, "CR-0");
        assert_eq!(found[0].campaign_name, "Unknown");
        assert_eq!(found[0].spend, 0.0);
        assert_eq!(found[0].identified_issue, IssueClass::LowEngagement.label());
    }

    #[test]
    fn healthy_rows_and_missing_cells_do_not_qualify() {
        let ds = Dataset::from_records(vec![rec(Some(1.0), Some(2.0)), rec(None, None), rec(Some(0.8), None)]);
        let th = Thresholds { low_ctr: 0.7,
                              low_roas: 1.5,
                              ..Thresholds::default() };
        assert!(find_underperformers(&ds, &th).is_empty());
    }

    #[test]
    fn record_id_is_used_when_present() {
        let mut r = rec(Some(0.2), Some(3.0));
        r.id = Some("AD-9".into());
        r.campaign_name = Some("Winter".into());
        r.spend = Some(120.5);
        let found = find_underperformers(&Dataset::from_records(vec![r]), &Thresholds::default());
        assert_eq!(found[0].creative_id, "AD-9");
        assert_eq!(found[0].campaign_name, "Winter");
        assert_eq!(found[0].spend, 120.5);
    }
}
