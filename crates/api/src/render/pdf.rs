//! A4 PDF documents built from lines of text.

use airwatch_core::compliance::failed_parameters;
use airwatch_core::report::{format_stamp, parameter_rows, SummaryRow};
use airwatch_db::models::measurement::MeasurementDetail;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::RenderError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 15.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 9.0;
const LINE_HEIGHT: f32 = 5.5;

/// Writes lines top to bottom, starting a new page when the current one
/// is full.
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT.0 - MARGIN,
        })
    }

    fn title(&mut self, text: &str) {
        self.layer
            .use_text(text, TITLE_SIZE, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT * 2.0;
    }

    fn line(&mut self, text: &str) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT.0 - MARGIN;
        }
        self.layer
            .use_text(text, BODY_SIZE, Mm(MARGIN), Mm(self.y), &self.regular);
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Multi-measurement summary: a title and one line per row.
pub fn summary_pdf(rows: &[SummaryRow]) -> Result<Vec<u8>, RenderError> {
    let mut pdf = PdfWriter::new("Relatório de Medições")?;
    pdf.title("Relatório de Medições");
    if rows.is_empty() {
        pdf.line("Nenhuma medição encontrada para os filtros informados.");
    }
    for row in rows {
        pdf.line(&row.pdf_line());
    }
    pdf.finish()
}

/// Single-measurement report: header block, then every labelled reading.
pub fn measurement_pdf(detail: &MeasurementDetail) -> Result<Vec<u8>, RenderError> {
    let m = &detail.measurement;
    let values = m.values();

    let mut pdf = PdfWriter::new("Relatório de Medição")?;
    pdf.title("Relatório de Medição");
    pdf.line(&format!("Data: {}", format_stamp(&m.date)));
    pdf.line(&format!("Instituição: {}", detail.institution_name));
    pdf.line(&format!("Setor: {}", detail.sector_name));
    pdf.line(&format!("Responsável: {}", detail.user_name));
    pdf.line(&format!("Status: {}", m.compliance().label()));
    pdf.gap();

    for (label, value) in parameter_rows(&values) {
        pdf.line(&format!("{label}: {value}"));
    }

    let failed = failed_parameters(&values);
    if !failed.is_empty() {
        pdf.gap();
        pdf.line(&format!("Fora do limite: {}", failed.join(", ")));
    }

    pdf.finish()
}
