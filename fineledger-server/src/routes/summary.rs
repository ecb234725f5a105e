//! Ledger summary page

use axum::{extract::State, response::Html};

use crate::error::ServerResult;
use crate::server::AppState;
use crate::views;

/// GET / - All records plus outstanding totals per member
pub async fn summary(State(state): State<AppState>) -> ServerResult<Html<String>> {
    let records = state.db.list_records(state.config.fine_rate)?;
    let totals = state.db.totals_by_name(state.config.fine_rate)?;

    let html = views::render_summary(&records, &totals, state.config.roster)?;
    Ok(Html(html))
}
