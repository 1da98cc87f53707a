//! Resumen del dataset: estadística global, tendencia de ROAS por fecha y
//! segmento de CTR bajo.
use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SummaryError;
use crate::record::Dataset;
use crate::stats::{describe, mean, ColumnStats};

/// Columnas numéricas resumidas, en este orden.
pub const NUMERIC_COLUMNS: [&str; 7] = ["spend", "impressions", "clicks", "ctr", "purchases", "revenue", "roas"];

const SAMPLE_CAMPAIGNS: usize = 5;

/// Umbrales configurables del análisis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_low_ctr")]
    pub low_ctr: f64,
    #[serde(default = "default_low_roas")]
    pub low_roas: f64,
    /// Caída porcentual de ROAS (inicio a fin) considerada significativa.
    #[serde(default = "default_roas_drop_pct")]
    pub roas_drop_pct: f64,
}

fn default_low_ctr() -> f64 {
    0.7
}
fn default_low_roas() -> f64 {
    1.5
}
fn default_roas_drop_pct() -> f64 {
    20.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low_ctr: default_low_ctr(),
               low_roas: default_low_roas(),
               roas_drop_pct: default_roas_drop_pct() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Decline,
    Growth,
    Unknown,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Decline => "decline",
            TrendDirection::Growth => "growth",
            TrendDirection::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoasTrend {
    pub start_roas: Option<f64>,
    pub end_roas: Option<f64>,
    pub trend_direction: TrendDirection,
    /// Variación porcentual de inicio a fin; `None` sin datos o con inicio 0.
    #[serde(default)]
    pub change_pct: Option<f64>,
    #[serde(default)]
    pub significant_drop: bool,
}

impl RoasTrend {
    pub fn unknown() -> Self {
        Self { start_roas: None,
               end_roas: None,
               trend_direction: TrendDirection::Unknown,
               change_pct: None,
               significant_drop: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowCtrSummary {
    pub count: usize,
    pub avg_ctr: Option<f64>,
    pub avg_roas: Option<f64>,
    #[serde(default)]
    pub sample_campaigns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub dataset_rows: usize,
    pub overall_summary: IndexMap<String, ColumnStats>,
    pub roas_trend: RoasTrend,
    pub low_ctr_summary: LowCtrSummary,
    pub timestamp: String,
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Interpreta una fecha en los formatos habituales de exportación.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"].iter()
                                                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                                                    .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Tendencia de ROAS: media por fecha, comparando la primera y la última.
pub fn roas_trend(dataset: &Dataset, thresholds: &Thresholds) -> RoasTrend {
    let mut by_date: BTreeMap<NaiveDateTime, Vec<f64>> = BTreeMap::new();
    for r in &dataset.records {
        if let (Some(date), Some(roas)) = (r.date.as_deref().and_then(parse_date), r.roas) {
            by_date.entry(date).or_default().push(roas);
        }
    }
    let series: Vec<f64> = by_date.values().filter_map(|v| mean(v)).collect();
    let (start, end) = match (series.first(), series.last()) {
        (Some(s), Some(e)) => (*s, *e),
        _ => return RoasTrend::unknown(),
    };
    let trend_direction = if end < start { TrendDirection::Decline } else { TrendDirection::Growth };
    let change_pct = (start != 0.0).then(|| round4((end - start) / start * 100.0));
    let significant_drop = change_pct.is_some_and(|c| c <= -thresholds.roas_drop_pct);
    RoasTrend { start_roas: Some(start),
                end_roas: Some(end),
                trend_direction,
                change_pct,
                significant_drop }
}

/// Segmento de filas con CTR por debajo del umbral.
pub fn low_ctr_summary(dataset: &Dataset, thresholds: &Thresholds) -> LowCtrSummary {
    let low: Vec<_> = dataset.records
                             .iter()
                             .filter(|r| r.ctr.is_some_and(|c| c < thresholds.low_ctr))
                             .collect();

    let mut distinct: Vec<Option<&str>> = Vec::new();
    for r in &low {
        let name = r.campaign_name.as_deref();
        if !distinct.contains(&name) {
            distinct.push(name);
        }
    }
    let ctrs: Vec<f64> = low.iter().filter_map(|r| r.ctr).collect();
    let roas: Vec<f64> = low.iter().filter_map(|r| r.roas).collect();

    LowCtrSummary { count: distinct.len(),
                    avg_ctr: mean(&ctrs).map(round4),
                    avg_roas: mean(&roas).map(round4),
                    sample_campaigns: distinct.iter()
                                              .flatten()
                                              .take(SAMPLE_CAMPAIGNS)
                                              .map(|s| s.to_string())
                                              .collect() }
}

/// Resume el dataset completo.
///
/// Falla si falta alguna columna esperada o no hay filas; quien llama debe
/// tratar el error como "sin datos para continuar".
pub fn summarize(dataset: &Dataset, thresholds: &Thresholds) -> Result<DataSummary, SummaryError> {
    for col in NUMERIC_COLUMNS.iter().chain(["date", "campaign_name"].iter()) {
        if !dataset.has_column(col) {
            return Err(SummaryError::MissingColumn((*col).to_string()));
        }
    }
    if dataset.is_empty() {
        return Err(SummaryError::NoRows);
    }

    let mut overall = IndexMap::new();
    for col in NUMERIC_COLUMNS {
        let values: Vec<Option<f64>> = dataset.records.iter().map(|r| r.metric(col)).collect();
        overall.insert(col.to_string(), describe(&values));
    }

    Ok(DataSummary { dataset_rows: dataset.len(),
                     overall_summary: overall,
                     roas_trend: roas_trend(dataset, thresholds),
                     low_ctr_summary: low_ctr_summary(dataset, thresholds),
                     timestamp: Local::now().to_rfc3339() })
}
