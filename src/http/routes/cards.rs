use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::app_state::AppState;
use crate::domain::CreditCard;
use crate::errors::ApiError;
use crate::services::CreditCardService;
use crate::store::postgres::CardRepository;

fn card_service(state: &AppState) -> Result<CreditCardService<CardRepository>, ApiError> {
    let pool = state
        .postgres
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable {
            details: "Database not available".to_string(),
        })?;
    Ok(CreditCardService::new(
        CardRepository::new(pool.clone()),
        state.clock.clone(),
    ))
}

#[derive(Debug, Serialize)]
pub struct ValidityResponse {
    pub valid: bool,
    pub violations: Vec<String>,
}

// GET /api/credit-cards
pub async fn list_credit_cards(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let cards = card_service(&state)?.list().await?;
    Ok(HttpResponse::Ok().json(cards))
}

// GET /api/credit-cards/{id}
pub async fn get_credit_card(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let card = card_service(&state)?.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(card))
}

// POST /api/credit-cards
pub async fn create_credit_card(
    body: web::Json<CreditCard>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let created = card_service(&state)?.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

// PUT /api/credit-cards/{id}
pub async fn update_credit_card(
    path: web::Path<i64>,
    body: web::Json<CreditCard>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let updated = card_service(&state)?
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

// DELETE /api/credit-cards/{id}
pub async fn delete_credit_card(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    card_service(&state)?.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// GET /api/credit-cards/{id}/valid
pub async fn is_credit_card_valid(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let service = card_service(&state)?;
    let card = service.get(path.into_inner()).await?;
    let violations = service.violations(&card);
    Ok(HttpResponse::Ok().json(ValidityResponse {
        valid: violations.is_empty(),
        violations,
    }))
}

// POST /api/credit-cards/is-distinct
pub async fn is_credit_card_distinct(
    body: web::Json<CreditCard>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let distinct = card_service(&state)?.is_distinct(&body).await?;
    Ok(HttpResponse::Ok().json(distinct))
}
