use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use booking_pricing::{
    app,
    cache::QuoteCache,
    pricing::{PriceCalculator, PricingPolicy},
    AppState,
};

fn test_app(policy: PricingPolicy) -> Router {
    app(AppState::new(
        PriceCalculator::new(policy),
        QuoteCache::new(100, Duration::from_secs(60)),
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn full_stack_selection() -> Value {
    json!({
        "base_price": 100000,
        "selected_add_ons": [
            {"add_on_id": "windows", "name": "Window cleaning", "price": 20000}
        ],
        "package_discount_percent": 10,
        "special_offer": {
            "id": "spring",
            "name": "Spring offer",
            "discount_type": "PERCENTAGE",
            "discount_value": 10
        },
        "referral_discount_percent": 5,
        "loyalty_discount_cents": 1000
    })
}

#[tokio::test]
async fn health_reports_policy() {
    let app = test_app(PricingPolicy::whole_units());
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rounding_increment"], 100);
}

#[tokio::test]
async fn breakdown_full_stack_in_whole_units() {
    let app = test_app(PricingPolicy::whole_units());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/breakdown",
        Some(full_stack_selection()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let breakdown = &body["breakdown"];
    assert_eq!(breakdown["subtotal"], 120000);
    assert_eq!(breakdown["package_discount"], 12000);
    assert_eq!(breakdown["subtotal_after_package"], 108000);
    assert_eq!(breakdown["special_offer_adjustment"], 10800);
    assert_eq!(breakdown["referral_discount"], 4900);
    assert_eq!(breakdown["loyalty_discount"], 1000);
    assert_eq!(breakdown["final_price"], 91300);
    assert_eq!(body["display"], true);

    let labels: Vec<&str> = body["line_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Base price",
            "Window cleaning",
            "Subtotal",
            "Package discount",
            "Spring offer",
            "Referral discount",
            "Loyalty points",
            "Total",
        ]
    );
}

#[tokio::test]
async fn breakdown_preview_clamps_bad_input() {
    let app = test_app(PricingPolicy::default());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/breakdown",
        Some(json!({"base_price": 1000, "package_discount_percent": 140})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breakdown"]["package_discount"], 1000);
    assert_eq!(body["breakdown"]["final_price"], 0);
}

#[tokio::test]
async fn quote_round_trip() {
    let app = test_app(PricingPolicy::default());
    let (status, created) = send(
        &app,
        "POST",
        "/api/pricing/quotes",
        Some(full_stack_selection()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["breakdown"]["final_price"], 91340);

    let uri = format!("/api/pricing/quotes/{}", created["quote_id"].as_str().unwrap());
    let (status, shown) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["breakdown"], created["breakdown"]);
}

#[tokio::test]
async fn quote_rejects_contract_violation() {
    let app = test_app(PricingPolicy::default());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/quotes",
        Some(json!({"base_price": -5, "referral_discount_percent": 101})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "contract_violation");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_quote_is_not_found() {
    let app = test_app(PricingPolicy::default());
    let (status, body) = send(
        &app,
        "GET",
        "/api/pricing/quotes/6f1c8a4e-8a8e-4c7c-9a43-3c2b1f0d9e11",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "quote_not_found");
}

#[tokio::test]
async fn authorize_accepts_matching_price() {
    let app = test_app(PricingPolicy::whole_units());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/authorize",
        Some(json!({"selection": full_stack_selection(), "final_price": 91300})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorized"], true);
    assert_eq!(body["final_price"], 91300);
}

#[tokio::test]
async fn authorize_rejects_tampered_price() {
    let app = test_app(PricingPolicy::whole_units());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/authorize",
        Some(json!({"selection": full_stack_selection(), "final_price": 50000})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "price_mismatch");
    assert_eq!(body["details"]["expected"], 91300);
    assert_eq!(body["details"]["submitted"], 50000);
}

#[tokio::test]
async fn premium_offer_raises_price_above_subtotal() {
    let app = test_app(PricingPolicy::default());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/breakdown",
        Some(json!({
            "base_price": 1000,
            "special_offer": {
                "id": "rush",
                "name": "Same-day service",
                "discount_type": "PREMIUM",
                "discount_value": 10,
                "max_discount": 10
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breakdown"]["special_offer_adjustment"], 100);
    assert_eq!(body["breakdown"]["final_price"], 1100);
    assert_eq!(body["breakdown"]["special_offer"]["status"], "applied");
}

#[tokio::test]
async fn malformed_body_returns_json_error() {
    let app = test_app(PricingPolicy::default());
    let request = Request::builder()
        .method("POST")
        .uri("/api/pricing/breakdown")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"base_price\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error_type"], "invalid_request");
}

#[tokio::test]
async fn missing_base_price_is_unprocessable() {
    let app = test_app(PricingPolicy::default());
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/quotes",
        Some(json!({"property_count": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "invalid_request");
}

#[tokio::test]
async fn quote_rejects_subtotal_over_limit() {
    let app = test_app(PricingPolicy::default());
    let max = booking_pricing::pricing::models::MAX_CENTS;
    let (status, body) = send(
        &app,
        "POST",
        "/api/pricing/quotes",
        Some(json!({
            "base_price": max,
            "selected_add_ons": [
                {"add_on_id": "a", "name": "Full renovation clean", "price": max}
            ],
            "special_offer": {
                "id": "rush", "name": "Rush",
                "discount_type": "PREMIUM", "discount_value": 100
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "subtotal");
}
