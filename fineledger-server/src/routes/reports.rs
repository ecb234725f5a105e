//! Report routes - PDF export and chart

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
};

use crate::error::{ServerError, ServerResult};
use crate::models::ReportQuery;
use crate::report;
use crate::server::AppState;

/// GET /export-pdf - Monthly PDF report for one member, as an attachment
pub async fn export_pdf(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ServerResult<(HeaderMap, Vec<u8>)> {
    if !(1..=12).contains(&query.month) {
        return Err(ServerError::BadRequest(format!(
            "month {} out of range 1-12",
            query.month
        )));
    }

    let records = state.db.monthly_records(
        &query.name,
        query.month,
        query.year,
        state.config.fine_rate,
    )?;
    let bytes = report::pdf::build_monthly_report(&query.name, query.month, query.year, &records)?;

    let filename = format!("report_{}_{}_{}.pdf", query.name, query.month, query.year);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .map_err(|e| ServerError::BadRequest(e.to_string()))?,
    );

    Ok((headers, bytes))
}

/// GET /chart - Outstanding fines per member as a PNG bar chart
pub async fn chart(State(state): State<AppState>) -> ServerResult<(HeaderMap, Vec<u8>)> {
    let totals = state.db.totals_by_name(state.config.fine_rate)?;
    let bytes = report::chart::render_totals_chart(&totals)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));

    Ok((headers, bytes))
}
