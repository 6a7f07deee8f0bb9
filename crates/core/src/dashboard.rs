//! Dashboard (BI) aggregation over a filtered set of measurements.
//!
//! The caller fetches rows in chronological order and passes the relevant
//! columns in; this module computes KPIs and the chart series.

use serde::Serialize;

use crate::compliance::ComplianceStatus;
use crate::types::Timestamp;

/// The columns of a measurement the dashboard needs.
#[derive(Debug, Clone, Copy)]
pub struct DashboardSample {
    pub date: Timestamp,
    pub temperature: f64,
    pub humidity: f64,
    pub status: ComplianceStatus,
}

/// Headline numbers shown above the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub temperature_avg: f64,
    pub humidity_avg: f64,
    pub compliant_count: usize,
    pub non_compliant_count: usize,
}

/// One point of the temperature/humidity time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn compute_kpis(samples: &[DashboardSample]) -> Kpis {
    let temperatures: Vec<f64> = samples.iter().map(|s| s.temperature).collect();
    let humidities: Vec<f64> = samples.iter().map(|s| s.humidity).collect();
    let compliant_count = samples.iter().filter(|s| s.status.is_compliant()).count();

    Kpis {
        temperature_avg: average(&temperatures),
        humidity_avg: average(&humidities),
        compliant_count,
        non_compliant_count: samples.len() - compliant_count,
    }
}

/// One point per sample, in input order.
pub fn build_series(samples: &[DashboardSample]) -> Vec<SeriesPoint> {
    samples
        .iter()
        .map(|s| SeriesPoint {
            date: s.date.format("%Y-%m-%d").to_string(),
            temperature: s.temperature,
            humidity: s.humidity,
        })
        .collect()
}
