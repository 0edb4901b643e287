use actix_web::{test, web, App};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::sync::Arc;

use creditcards_api::app_state::AppState;
use creditcards_api::config::ServiceConfig;
use creditcards_api::domain::clock::FixedClock;
use creditcards_api::http::routes;

/// State without a database pool; the clock is frozen so fee quotes are
/// reproducible.
fn build_state() -> web::Data<AppState> {
    let clock = FixedClock(Utc.with_ymd_and_hms(2022, 12, 10, 12, 0, 0).unwrap());
    web::Data::new(AppState::new(
        ServiceConfig::default(),
        None,
        Arc::new(clock),
    ))
}

fn fee_from(body: &serde_json::Value) -> Decimal {
    Decimal::from_str(body["fee"].as_str().expect("fee should be a string")).unwrap()
}

#[actix_rt::test]
async fn test_healthz_returns_ok() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_readyz_without_postgres_reports_disabled() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/readyz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["postgres"]["enabled"], false);
}

#[actix_rt::test]
async fn test_version_reports_service_identity() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/version").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "creditcards-api");
}

#[actix_rt::test]
async fn test_list_credit_cards_without_database_returns_503() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/credit-cards").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);
}

#[actix_rt::test]
async fn test_create_transaction_without_database_returns_503() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/transactions")
        .set_json(serde_json::json!({ "credit_card_id": 1, "amount": "10.00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);
}

#[actix_rt::test]
async fn test_fee_quote_visa_december_2022() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    // yy / mm = 22 / 12 rounds to a 1.83 rate, so 100 pays 1.83
    let req = test::TestRequest::get()
        .uri("/api/transactions/fee?brand=VISA&amount=100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["brand"], "VISA");
    assert_eq!(fee_from(&body), dec!(1.83));
}

#[actix_rt::test]
async fn test_fee_quote_nara_scales_with_day_of_month() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    // day 10 at half a percent per day means a 5% rate
    let req = test::TestRequest::get()
        .uri("/api/transactions/fee?brand=NARA&amount=100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fee_from(&body), dec!(5));
}

#[actix_rt::test]
async fn test_fee_quote_amex_scales_with_month() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/transactions/fee?brand=AMEX&amount=100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fee_from(&body), dec!(1.2));
}

#[actix_rt::test]
async fn test_fee_quote_unknown_brand_is_free() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/transactions/fee?brand=DINERS&amount=100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fee_from(&body), Decimal::ZERO);
}

#[actix_rt::test]
async fn test_validate_transaction_accepts_in_range_amount() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/transactions/validate")
        .set_json(serde_json::json!({
            "credit_card": {
                "card_number": "1234567890123456",
                "holder_name": "John Doe",
                "expiration_date": "2030-01",
                "brand": "VISA"
            },
            "amount": "500.00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], true);
}

#[actix_rt::test]
async fn test_validate_transaction_without_card_returns_404() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/transactions/validate")
        .set_json(serde_json::json!({ "amount": "500.00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_rt::test]
async fn test_validate_transaction_rejects_amount_over_limit() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/transactions/validate")
        .set_json(serde_json::json!({
            "credit_card": {
                "card_number": "1234567890123456",
                "holder_name": "John Doe",
                "expiration_date": "2030-01",
                "brand": "VISA"
            },
            "amount": "1000.01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Bad request");
}

#[actix_rt::test]
async fn test_validate_transaction_rejects_zero_amount() {
    let app = test::init_service(
        App::new()
            .app_data(build_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/transactions/validate")
        .set_json(serde_json::json!({
            "credit_card": {
                "card_number": "1234567890123456",
                "holder_name": "John Doe",
                "expiration_date": "2030-01",
                "brand": "VISA"
            },
            "amount": "0"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}
