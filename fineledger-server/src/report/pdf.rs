//! Monthly PDF report
//!
//! One title line, then one line per record with date, violation count,
//! amount paid and outstanding fine. Fixed built-in font, single page.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::{ServerError, ServerResult};
use crate::models::FineRecord;

// A4 portrait
const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 20.0;
const LINE_HEIGHT_MM: f64 = 8.0;
const FONT_SIZE: f64 = 12.0;

/// Build the PDF bytes for one member's records in a given month.
///
/// An empty record slice yields a document carrying only the title line.
pub fn build_monthly_report(
    name: &str,
    month: u32,
    year: i32,
    records: &[FineRecord],
) -> ServerResult<Vec<u8>> {
    let title = format!("Fine report {:02}-{} - {}", month, year, name);

    let (doc, page, layer) = PdfDocument::new(
        &title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "report",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ServerError::Report(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text(&title, FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
    y -= 2.0 * LINE_HEIGHT_MM;

    for record in records {
        let line = format!(
            "{} - violations: {}, paid: {}, outstanding: {}",
            record.date.format("%Y-%m-%d"),
            record.violations,
            record.amount_paid,
            record.outstanding,
        );
        layer.use_text(&line, FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes()
        .map_err(|e| ServerError::Report(e.to_string()))
}
