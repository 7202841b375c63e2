use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerOptions, types::reconciliation::PdfDocument};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(Arc::new(engine), ServerOptions::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let (status, bytes) = send(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn sample(store: &str, timestamp: &str) -> Value {
    json!({
        "store": store,
        "responsible": "Juan Pérez",
        "timestamp": timestamp,
        "opening_float": 1000.0,
        "card_sales": 500.0,
        "cash_counts": {
            "nio": {"1": 1, "5": 1, "10": 1, "20": 1, "50": 1, "100": 1, "500": 1},
            "usd": {"1": 5, "5": 2, "10": 1}
        },
        "expenses": [
            {"concept": "Combustible", "amount": 100.0},
            {"concept": "Mantenimiento", "amount": 50.0}
        ]
    })
}

fn approx(value: &Value, expected: f64) -> bool {
    value.as_f64().is_some_and(|v| (v - expected).abs() < 0.01)
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = app().await;
    let (status, body) = send_json(&app, "GET", "/api/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("ARQUEO"));
}

#[tokio::test]
async fn create_returns_computed_totals() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(sample("Rusti-K", "2026-10-16T18:00:00-06:00")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(approx(&body["local_currency_total"], 686.0));
    assert!(approx(&body["foreign_currency_total"], 25.0));
    assert!(approx(&body["foreign_in_local_total"], 912.5));
    assert!(approx(&body["expenses_total"], 150.0));
    assert!(approx(&body["grand_total"], 2948.5));
    assert!(approx(&body["exchange_rate"], 36.5));
    assert_eq!(body["timestamp"], "2026-10-17T00:00:00Z");
    assert_eq!(body["cash_counts"]["usd"]["1"], 5);

    let id = body["id"].as_str().unwrap();
    let (status, fetched) = send_json(&app, "GET", &format!("/api/arqueo/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn missing_amounts_default_to_zero() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(json!({"store": "Rusti-K", "responsible": "Ana"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(approx(&body["grand_total"], 0.0));
    assert!(approx(&body["expenses_total"], 0.0));
}

#[tokio::test]
async fn blank_store_is_unprocessable() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(json!({"store": "  ", "responsible": "Ana"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid input: store must not be empty");
}

#[tokio::test]
async fn unknown_denomination_is_unprocessable() {
    let app = app().await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(json!({"store": "Rusti-K", "responsible": "Ana", "cash_counts": {"usd": {"500": 1}}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn out_of_range_amount_is_unprocessable() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(json!({"store": "Rusti-K", "responsible": "Ana", "opening_float": 7e28})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid amount: opening_float: amount too large");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(json!({"store": "Rusti-K", "responsible": "Ana", "card_sales": -9.2e16})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send_json(&app, "GET", "/api/arqueo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn timestamp_without_offset_is_unprocessable() {
    let app = app().await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(sample("Rusti-K", "2026-10-16T18:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(sample("Rusti-K", "2026-10-16T18:00:00.000Z")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timestamp"], "2026-10-16T18:00:00Z");
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = app().await;
    for (store, ts) in [
        ("Norte", "2026-10-14T10:00:00Z"),
        ("Centro", "2026-10-16T10:00:00Z"),
        ("Sur", "2026-10-15T10:00:00Z"),
    ] {
        let (status, _) = send_json(&app, "POST", "/api/arqueo", Some(sample(store, ts))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send_json(&app, "GET", "/api/arqueo", None).await;
    assert_eq!(status, StatusCode::OK);
    let stores: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["store"].as_str().unwrap())
        .collect();
    assert_eq!(stores, ["Centro", "Sur", "Norte"]);
}

#[tokio::test]
async fn unknown_or_malformed_id_is_not_found() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "GET",
        "/api/arqueo/6f1c5a5e-3a39-4d55-9f0e-4d0c2b7c1a11",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Arqueo not found");

    let (status, _) = send_json(&app, "GET", "/api/arqueo/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "POST", "/api/arqueo/not-an-id/pdf", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pdf_is_returned_base64_encoded() {
    use base64::Engine as _;

    let app = app().await;
    let (_, created) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(sample("Rusti-K", "2026-10-16T18:00:00Z")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send_json(&app, "POST", &format!("/api/arqueo/{id}/pdf"), None).await;
    assert_eq!(status, StatusCode::OK);
    let doc: PdfDocument = serde_json::from_value(body).unwrap();
    assert_eq!(doc.filename, format!("arqueo_Rusti-K_{id}.pdf"));

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(doc.pdf_base64)
        .unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(
        bytes
            .windows(b"TOTAL FINAL: C$ 2948.50".len())
            .any(|w| w == b"TOTAL FINAL: C$ 2948.50")
    );
}

#[tokio::test]
async fn pdf_can_be_downloaded() {
    let app = app().await;
    let (_, created) = send_json(
        &app,
        "POST",
        "/api/arqueo",
        Some(sample("Rusti-K", "2026-10-16T18:00:00Z")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/api/arqueo/{id}/pdf"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"arqueo_Rusti-K_"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF-"));
}
