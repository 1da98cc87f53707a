//! Estadística descriptiva por columna (count, mean, std, min, cuartiles,
//! max), ignorando valores ausentes.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Desviación estándar muestral (n - 1). `None` con menos de 2 valores.
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Cuantil con interpolación lineal sobre una serie ya ordenada.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
        }
    }
}

pub fn describe(values: &[Option<f64>]) -> ColumnStats {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);
    let n = present.len();
    let avg = mean(&present);
    let std = match (avg, n) {
        (Some(m), n) if n > 1 => {
            let var = present.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(var.sqrt())
        }
        _ => None,
    };
    ColumnStats { count: n,
                  mean: avg,
                  std,
                  min: present.first().copied(),
                  p25: quantile(&present, 0.25),
                  p50: quantile(&present, 0.5),
                  p75: quantile(&present, 0.75),
                  max: present.last().copied() }
}
