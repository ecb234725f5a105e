//! HTML views
//!
//! Templates are embedded in the binary and compiled once on first use.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::error::ServerResult;
use crate::models::{FineRecord, NameTotal, PaymentTarget};

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("index.html", include_str!("../templates/index.html")),
        ("pay.html", include_str!("../templates/pay.html")),
    ])
    .expect("invalid embedded template");
    tera
});

/// Render the summary page: all records plus per-member totals.
pub fn render_summary(
    records: &[FineRecord],
    totals: &[NameTotal],
    roster: &[&str],
) -> ServerResult<String> {
    let mut ctx = Context::new();
    ctx.insert("records", records);
    ctx.insert("totals", totals);
    ctx.insert("roster", roster);

    Ok(TEMPLATES.render("index.html", &ctx)?)
}

/// Render the payment form for one record.
pub fn render_payment_form(target: &PaymentTarget) -> ServerResult<String> {
    let mut ctx = Context::new();
    ctx.insert("target", target);

    Ok(TEMPLATES.render("pay.html", &ctx)?)
}
