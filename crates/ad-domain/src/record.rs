//! Registros de performance publicitaria y carga desde CSV.
//!
//! Los encabezados se normalizan a minúsculas. `ad_id` se acepta como alias
//! de `id`. Las celdas numéricas vacías o inválidas quedan como `None`.
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Una fila del dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: Option<String>,
    pub campaign_name: Option<String>,
    pub spend: Option<f64>,
    pub impressions: Option<f64>,
    pub clicks: Option<f64>,
    pub ctr: Option<f64>,
    pub purchases: Option<f64>,
    pub revenue: Option<f64>,
    pub roas: Option<f64>,
    pub date: Option<String>,
}

impl AdRecord {
    /// Valor numérico de una columna conocida.
    pub fn metric(&self, column: &str) -> Option<f64> {
        match column {
            "spend" => self.spend,
            "impressions" => self.impressions,
            "clicks" => self.clicks,
            "ctr" => self.ctr,
            "purchases" => self.purchases,
            "revenue" => self.revenue,
            "roas" => self.roas,
            _ => None,
        }
    }
}

/// Dataset cargado: columnas presentes (ya normalizadas) y filas en orden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<AdRecord>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<AdRecord>) -> Self {
        Self { columns, records }
    }

    /// Dataset en memoria con todas las columnas esperadas.
    pub fn from_records(records: Vec<AdRecord>) -> Self {
        let columns = ["id", "campaign_name", "spend", "impressions", "clicks", "ctr", "purchases", "revenue", "roas",
                       "date"].iter()
                              .map(|c| c.to_string())
                              .collect();
        Self { columns, records }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn parse_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_text(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Carga el dataset desde un CSV con encabezados.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| match e.kind() {
                                   std::io::ErrorKind::NotFound => DatasetError::NotFound(display.clone()),
                                   _ => DatasetError::Decode(format!("{display}: {e}")),
                               })?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);

    let mut columns: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(DatasetError::Empty(display));
    }
    if !columns.iter().any(|c| c == "id") {
        if let Some(c) = columns.iter_mut().find(|c| c.as_str() == "ad_id") {
            *c = "id".to_string();
        }
    }
    let index_of = |name: &str| columns.iter().position(|c| c == name);
    let idx: Vec<Option<usize>> = ["id", "campaign_name", "spend", "impressions", "clicks", "ctr", "purchases",
                                   "revenue", "roas", "date"].iter()
                                                             .map(|c| index_of(*c))
                                                             .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |i: usize| idx[i].and_then(|j| row.get(j));
        records.push(AdRecord { id: cell(0).and_then(parse_text),
                                campaign_name: cell(1).and_then(parse_text),
                                spend: cell(2).and_then(parse_number),
                                impressions: cell(3).and_then(parse_number),
                                clicks: cell(4).and_then(parse_number),
                                ctr: cell(5).and_then(parse_number),
                                purchases: cell(6).and_then(parse_number),
                                revenue: cell(7).and_then(parse_number),
                                roas: cell(8).and_then(parse_number),
                                date: cell(9).and_then(parse_text) });
    }
    if records.is_empty() {
        return Err(DatasetError::Empty(display));
    }
    log::debug!("dataset {} loaded: {} rows, {} columns", path.display(), records.len(), columns.len());
    Ok(Dataset::new(columns, records))
}
