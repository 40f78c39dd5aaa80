use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use backoffice_db::{Database, DbConfig};

use super::{router, with_layers};
use crate::state::AppState;

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    router(AppState::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_product(app: &Router, name: &str, price_cents: i64, stock: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/produtos",
        Some(json!({
            "name": name,
            "description": format!("{name} description"),
            "priceCents": price_cents,
            "stockQuantity": stock
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = app().await;
    let id = create_product(&app, "Pen", 150, 3).await;

    let (status, body) = send(&app, Method::GET, &format!("/produtos/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priceCents"], 150);
    assert_eq!(body["isActive"], true);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/produtos/{id}"),
        Some(json!({
            "name": "Pen",
            "description": "Blue pen",
            "priceCents": 175,
            "stockQuantity": 12,
            "isActive": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stockQuantity"], 12);

    let (status, body) = send(&app, Method::PATCH, &format!("/produtos/{id}/inativar"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, all) = send(&app, Method::GET, "/produtos", None).await;
    let (_, active) = send(&app, Method::GET, "/produtos/ativos", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert!(active.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_price_is_rejected() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/produtos",
        Some(json!({
            "name": "Free",
            "description": "Nothing",
            "priceCents": 0,
            "stockQuantity": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["path"], "/produtos");
}

#[tokio::test]
async fn test_sale_scenario() {
    let app = app().await;
    let id = create_product(&app, "A", 500, 10).await;

    let (status, sale) = send(
        &app,
        Method::POST,
        "/vendas",
        Some(json!([{ "productId": id, "quantity": 3 }])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["totalCents"], 1500);
    assert_eq!(sale["items"][0]["productName"], "A");

    let (_, product) = send(&app, Method::GET, &format!("/produtos/{id}"), None).await;
    assert_eq!(product["stockQuantity"], 7);

    let (status, body) = send(
        &app,
        Method::POST,
        "/vendas",
        Some(json!([{ "productId": id, "quantity": 8 }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Insufficient stock"));
    assert_eq!(body["path"], "/vendas");

    let (_, product) = send(&app, Method::GET, &format!("/produtos/{id}"), None).await;
    assert_eq!(product["stockQuantity"], 7);

    let (_, sales) = send(&app, Method::GET, "/vendas", None).await;
    assert_eq!(sales.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_sale_update_and_delete() {
    let app = app().await;
    let id = create_product(&app, "A", 500, 10).await;
    let (_, sale) = send(
        &app,
        Method::POST,
        "/vendas",
        Some(json!([{ "productId": id, "quantity": 4 }])),
    )
    .await;
    let sale_id = sale["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/vendas/{sale_id}"),
        Some(json!([{ "productId": id, "quantity": 10 }])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["totalCents"], 5000);

    let (status, _) = send(&app, Method::DELETE, &format!("/vendas/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/vendas/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["path"], format!("/vendas/{sale_id}"));

    // Deleting does not give stock back.
    let (_, product) = send(&app, Method::GET, &format!("/produtos/{id}"), None).await;
    assert_eq!(product["stockQuantity"], 0);
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let app = app().await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/vendas")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/vendas", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, Method::GET, "/vendas/relatorio/data?startDate=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reports() {
    let app = app().await;
    let id = create_product(&app, "A", 500, 10).await;
    send(
        &app,
        Method::POST,
        "/vendas",
        Some(json!([{ "productId": id, "quantity": 1 }])),
    )
    .await;

    let today = Utc::now().date_naive();
    let (status, by_date) = send(
        &app,
        Method::GET,
        &format!("/vendas/relatorio/data?startDate={today}&endDate={today}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_date.as_array().unwrap().len(), 1);

    let (status, by_month) = send(
        &app,
        Method::GET,
        &format!("/vendas/relatorio/mes?ano={}&mes={}", today.year(), today.month()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_month.as_array().unwrap().len(), 1);

    let (status, week) = send(&app, Method::GET, "/vendas/relatorio/semana-atual", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(week.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/vendas/relatorio/mes?ano=2026&mes=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/nowhere");
}

async fn explode() -> StatusCode {
    panic!("handler exploded")
}

#[tokio::test]
async fn test_handler_panic_renders_internal_error() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = with_layers(Router::new().route("/explode", axum::routing::get(explode)))
        .with_state(AppState::new(db));

    let (status, body) = send(&app, Method::GET, "/explode", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL");
    assert_eq!(body["status"], 500);
    assert_eq!(body["path"], "/explode");
    assert_eq!(body["message"], "An internal error occurred");
}
