//! Report formats, file names and text formatting for measurement exports.
//!
//! Rendering to PDF/XLSX bytes happens in the API crate; everything here is
//! plain string work so it can be tested without the renderers.

use chrono::SecondsFormat;

use crate::compliance::{ComplianceStatus, MeasurementValues};
use crate::error::CoreError;
use crate::types::Timestamp;
use crate::uploads::underscore_whitespace;

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ReportFormat {
    /// Parse the `format` query parameter. Missing means PDF.
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        match value.unwrap_or("pdf") {
            "pdf" => Ok(Self::Pdf),
            "excel" | "xlsx" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            other => Err(CoreError::Validation(format!(
                "Unknown report format: '{other}'. Valid formats: pdf, excel, csv"
            ))),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    /// Download name for the multi-measurement report.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Pdf => "relatorio.pdf",
            Self::Excel => "relatorio.xlsx",
            Self::Csv => "relatorio.csv",
        }
    }
}

/// `Content-Disposition` value for an attachment download.
pub fn attachment_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `dd/mm/yyyy`
pub fn format_date(ts: &Timestamp) -> String {
    ts.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy | HH:MM`
pub fn format_stamp(ts: &Timestamp) -> String {
    ts.format("%d/%m/%Y | %H:%M").to_string()
}

/// ISO-8601 with millisecond precision, e.g. `2025-03-09T14:30:00.000Z`.
pub fn format_iso(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// File name of a single-measurement PDF:
/// `medicao_<YYYY-MM-DD>_<institution>_<sector>.pdf` with whitespace runs
/// replaced by `_`.
pub fn measurement_report_filename(date: &Timestamp, institution: &str, sector: &str) -> String {
    let raw = format!(
        "medicao_{}_{institution}_{sector}.pdf",
        date.format("%Y-%m-%d")
    );
    underscore_whitespace(&raw).into_owned()
}

// ---------------------------------------------------------------------------
// Summary report rows
// ---------------------------------------------------------------------------

/// Column headers of the spreadsheet / CSV summary report.
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "Data",
    "Instituição",
    "Setor",
    "Temp (°C)",
    "Umidade (%)",
    "CO2 Int (ppm)",
    "CO2 Ext (ppm)",
    "Status",
];

/// One row of the multi-measurement report.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub date: Timestamp,
    pub institution: String,
    pub sector: String,
    pub temperature: f64,
    pub humidity: f64,
    pub co2_internal: f64,
    pub co2_external: f64,
    pub status: ComplianceStatus,
}

impl SummaryRow {
    /// The line printed for this row in the PDF summary.
    pub fn pdf_line(&self) -> String {
        format!(
            "{} | {} > {} | Temp: {} °C | Umid: {}% | Status: {}",
            format_date(&self.date),
            self.institution,
            self.sector,
            self.temperature,
            self.humidity,
            self.status.label()
        )
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the summary report as CSV (header line plus one line per row).
pub fn build_csv(rows: &[SummaryRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(SUMMARY_COLUMNS.join(","));

    for row in rows {
        let cells = [
            format_iso(&row.date),
            csv_escape(&row.institution),
            csv_escape(&row.sector),
            row.temperature.to_string(),
            row.humidity.to_string(),
            row.co2_internal.to_string(),
            row.co2_external.to_string(),
            csv_escape(row.status.label()),
        ];
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Single-measurement detail
// ---------------------------------------------------------------------------

/// Labelled parameter rows of the single-measurement report, in print order.
pub fn parameter_rows(v: &MeasurementValues) -> [(&'static str, f64); 13] {
    [
        ("Temperatura (°C)", v.temperature),
        ("Umidade (%)", v.humidity),
        ("Velocidade do ar (m/s)", v.air_speed),
        ("Fungos Internos (UFC/m³)", v.fungi_internal),
        ("Fungos Externos (UFC/m³)", v.fungi_external),
        ("Relação I/E", v.ie_ratio),
        ("Aerodispersóides (µg/m³)", v.aerodispersoids),
        ("Bactérias Internas (UFC/m³)", v.bacteria_internal),
        ("Bactérias Externas (UFC/m³)", v.bacteria_external),
        ("CO2 Interno (ppm)", v.co2_internal),
        ("CO2 Externo (ppm)", v.co2_external),
        ("PM10 (µg/m³)", v.pm10),
        ("PM2.5 (µg/m³)", v.pm25),
    ]
}
