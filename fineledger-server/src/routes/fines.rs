//! Fine record routes - create, pay, delete

use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};
use chrono::Local;

use crate::error::{ServerError, ServerResult};
use crate::models::{CreateFineRequest, PaymentRequest};
use crate::server::AppState;
use crate::views;

/// POST /add - Record violations for a registered member
pub async fn add_fine(
    State(state): State<AppState>,
    Form(req): Form<CreateFineRequest>,
) -> ServerResult<Redirect> {
    if !state.config.is_registered(&req.name) {
        return Err(ServerError::BadRequest(format!(
            "name '{}' is not registered",
            req.name
        )));
    }

    if req.violations < 0 {
        return Err(ServerError::BadRequest(
            "violation count cannot be negative".into(),
        ));
    }

    let today = Local::now().date_naive();
    let id = state.db.insert_record(&req.name, req.violations, today)?;
    tracing::debug!(id, name = %req.name, violations = req.violations, "recorded violations");

    Ok(Redirect::to("/"))
}

/// GET /pay/{id} - Payment form for one record
pub async fn payment_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServerResult<Html<String>> {
    let target = state
        .db
        .payment_target(id)?
        .ok_or_else(|| ServerError::NotFound(format!("record {} not found", id)))?;

    Ok(Html(views::render_payment_form(&target)?))
}

/// POST /pay/{id} - Add a payment to a record
///
/// The increment has no upper bound; overpayment drives the outstanding
/// amount negative and is accepted.
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(req): Form<PaymentRequest>,
) -> ServerResult<Redirect> {
    if req.amount < 0 {
        return Err(ServerError::BadRequest(
            "payment amount cannot be negative".into(),
        ));
    }

    if !state.db.record_payment(id, req.amount)? {
        return Err(ServerError::NotFound(format!("record {} not found", id)));
    }

    Ok(Redirect::to("/"))
}

/// POST /delete/{id} - Remove a record
///
/// Deleting an unknown id is a no-op.
pub async fn delete_fine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServerResult<Redirect> {
    if !state.db.delete_record(id)? {
        tracing::debug!(id, "delete matched no record");
    }

    Ok(Redirect::to("/"))
}
