//! End-to-end router tests
//!
//! Drives the full HTTP surface against an in-memory database: recording
//! violations, payments (including overpayment), deletion, and both report
//! endpoints.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use tower::ServiceExt;

use fineledger_server::{create_router, AppConfig, AppState, Database};

const RATE: i64 = 5000;

fn test_app() -> (Router, Database) {
    let db = Database::open_in_memory().unwrap();
    let state = AppState::new(db.clone(), AppConfig::default());
    (create_router(state, 30), db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn header_str<'a>(response: &'a Response<Body>, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn payment_lifecycle() {
    let (app, db) = test_app();

    // Create: 2 violations at 5000 each
    let response = post_form(&app, "/add", "name=Seto&violations=2").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, header::LOCATION), "/");

    let records = db.list_records(RATE).unwrap();
    assert_eq!(records.len(), 1);
    let id = records[0].id;
    assert_eq!(records[0].outstanding, 10_000);

    let page = body_string(get(&app, "/").await).await;
    assert!(page.contains("10000"));

    // First payment
    let response = post_form(&app, &format!("/pay/{}", id), "amount=4000").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let records = db.list_records(RATE).unwrap();
    assert_eq!(records[0].amount_paid, 4000);
    assert_eq!(records[0].outstanding, 6000);

    // Overpayment is accepted and the outstanding amount goes negative
    let response = post_form(&app, &format!("/pay/{}", id), "amount=7000").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let records = db.list_records(RATE).unwrap();
    assert_eq!(records[0].amount_paid, 11_000);
    assert_eq!(records[0].outstanding, -1000);

    let page = body_string(get(&app, "/").await).await;
    assert!(page.contains("-1000"));

    // Delete removes the record from the ledger and the aggregate
    let response = post_form(&app, &format!("/delete/{}", id), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(db.list_records(RATE).unwrap().is_empty());
    assert!(db.totals_by_name(RATE).unwrap().is_empty());

    let page = body_string(get(&app, "/").await).await;
    assert!(!page.contains("-1000"));
}

#[tokio::test]
async fn unregistered_name_is_rejected_with_plain_text() {
    let (app, db) = test_app();

    let response = post_form(&app, "/add", "name=Nobody&violations=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("not registered"));

    assert!(db.list_records(RATE).unwrap().is_empty());
}

#[tokio::test]
async fn malformed_violation_count_is_a_client_error() {
    let (app, db) = test_app();

    let response = post_form(&app, "/add", "name=Seto&violations=abc").await;
    assert!(response.status().is_client_error());
    assert!(db.list_records(RATE).unwrap().is_empty());
}

#[tokio::test]
async fn negative_inputs_are_rejected() {
    let (app, db) = test_app();

    let response = post_form(&app, "/add", "name=Seto&violations=-1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let id = db.insert_record("Seto", 1, date(2024, 5, 1)).unwrap();
    let response = post_form(&app, &format!("/pay/{}", id), "amount=-500").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(db.list_records(RATE).unwrap()[0].amount_paid, 0);
}

#[tokio::test]
async fn payment_form_shows_target_record() {
    let (app, db) = test_app();
    let id = db.insert_record("Nina", 3, date(2024, 5, 1)).unwrap();

    let response = get(&app, &format!("/pay/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_string(response).await;
    assert!(page.contains("Nina"));
    assert!(page.contains(&format!("/pay/{}", id)));
}

#[tokio::test]
async fn unknown_record_id_on_payment_is_404() {
    let (app, _db) = test_app();

    let response = get(&app, "/pay/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(&app, "/pay/999", "amount=100").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_id_is_a_silent_no_op() {
    let (app, db) = test_app();
    db.insert_record("Adit", 1, date(2024, 5, 1)).unwrap();

    let response = post_form(&app, "/delete/999", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(db.list_records(RATE).unwrap().len(), 1);
}

#[tokio::test]
async fn pdf_export_filters_by_name_and_month() {
    let (app, db) = test_app();
    db.insert_record("Tias", 1, date(2024, 5, 2)).unwrap();
    db.insert_record("Tias", 2, date(2024, 6, 2)).unwrap();
    db.insert_record("Seto", 4, date(2024, 5, 2)).unwrap();

    let response = get(&app, "/export-pdf?name=Tias&month=5&year=2024").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::CONTENT_TYPE),
        "application/pdf"
    );
    assert!(header_str(&response, header::CONTENT_DISPOSITION)
        .contains("report_Tias_5_2024.pdf"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn pdf_export_with_no_matches_still_returns_a_document() {
    let (app, _db) = test_app();

    let response = get(&app, "/export-pdf?name=Tias&month=4&year=2024").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn pdf_export_validates_query_parameters() {
    let (app, _db) = test_app();

    let response = get(&app, "/export-pdf?name=Tias&month=13&year=2024").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing month/year is rejected by the extractor
    let response = get(&app, "/export-pdf?name=Tias").await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn chart_returns_png() {
    let (app, db) = test_app();
    db.insert_record("Tias", 2, date(2024, 5, 2)).unwrap();
    db.insert_record("Seto", 1, date(2024, 5, 3)).unwrap();

    let response = get(&app, "/chart").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), "image/png");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[tokio::test]
async fn chart_renders_with_empty_ledger() {
    let (app, _db) = test_app();

    let response = get(&app, "/chart").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn summary_aggregate_matches_per_record_sum() {
    let (app, db) = test_app();
    let first = db.insert_record("Tias", 2, date(2024, 5, 1)).unwrap();
    db.insert_record("Tias", 1, date(2024, 5, 3)).unwrap();
    db.record_payment(first, 2500).unwrap();

    let records = db.list_records(RATE).unwrap();
    let per_record: i64 = records
        .iter()
        .filter(|r| r.name == "Tias")
        .map(|r| r.outstanding)
        .sum();

    let totals = db.totals_by_name(RATE).unwrap();
    assert_eq!(totals[0].outstanding, per_record);

    let page = body_string(get(&app, "/").await).await;
    assert!(page.contains(&per_record.to_string()));
}
