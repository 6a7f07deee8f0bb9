//! Binary report rendering: PDF via `printpdf`, spreadsheets via
//! `rust_xlsxwriter`. Text content comes from `airwatch_core::report`.

pub mod pdf;
pub mod xlsx;

use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("Spreadsheet rendering failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
