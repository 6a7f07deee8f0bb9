//! Spreadsheet export of the measurement summary.

use airwatch_core::report::{format_iso, SummaryRow, SUMMARY_COLUMNS};
use rust_xlsxwriter::{Format, Workbook};

use super::RenderError;

/// Worksheet holding the summary rows.
pub const SHEET_NAME: &str = "Medições";

/// One worksheet: a bold header row, then one row per measurement.
pub fn summary_xlsx(rows: &[SummaryRow]) -> Result<Vec<u8>, RenderError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in SUMMARY_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, format_iso(&row.date))?;
        sheet.write_string(r, 1, &row.institution)?;
        sheet.write_string(r, 2, &row.sector)?;
        sheet.write_number(r, 3, row.temperature)?;
        sheet.write_number(r, 4, row.humidity)?;
        sheet.write_number(r, 5, row.co2_internal)?;
        sheet.write_number(r, 6, row.co2_external)?;
        sheet.write_string(r, 7, row.status.label())?;
    }

    Ok(workbook.save_to_buffer()?)
}
