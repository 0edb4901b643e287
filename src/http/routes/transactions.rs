use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::validation::validate_admission;
use crate::domain::{fees, CreditCard};
use crate::errors::ApiError;
use crate::services::TransactionService;
use crate::store::postgres::{CardRepository, TransactionRepository};

fn transaction_service(
    state: &AppState,
) -> Result<TransactionService<TransactionRepository, CardRepository>, ApiError> {
    let pool = state
        .postgres
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable {
            details: "Database not available".to_string(),
        })?;
    Ok(TransactionService::new(
        TransactionRepository::new(pool.clone()),
        CardRepository::new(pool.clone()),
        state.clock.clone(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub credit_card_id: i64,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub credit_card_id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
}

/// Admission check payload: the card comes by value, so this path never
/// touches the store.
#[derive(Debug, Deserialize)]
pub struct ValidateTransactionRequest {
    #[serde(default)]
    pub credit_card: Option<CreditCard>,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct FeeQuery {
    pub brand: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FeeResponse {
    pub brand: String,
    pub amount: Decimal,
    pub fee: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
}

// GET /api/transactions
pub async fn list_transactions(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let transactions = transaction_service(&state)?.list().await?;
    Ok(HttpResponse::Ok().json(transactions))
}

// GET /api/transactions/{id}
pub async fn get_transaction(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let transaction = transaction_service(&state)?.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

// POST /api/transactions
pub async fn create_transaction(
    body: web::Json<CreateTransactionRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let created = transaction_service(&state)?
        .create(body.credit_card_id, body.amount)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

// PUT /api/transactions/{id}
pub async fn update_transaction(
    path: web::Path<i64>,
    body: web::Json<UpdateTransactionRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let updated = transaction_service(&state)?
        .update(
            path.into_inner(),
            body.credit_card_id,
            body.amount,
            body.date_time,
        )
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

// DELETE /api/transactions/{id}
pub async fn delete_transaction(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    transaction_service(&state)?.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// POST /api/transactions/validate
pub async fn validate_transaction(
    body: web::Json<ValidateTransactionRequest>,
) -> Result<impl Responder, ApiError> {
    validate_admission(body.credit_card.as_ref(), body.amount).map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(ValidationResponse { valid: true }))
}

// GET /api/transactions/fee
pub async fn quote_fee(
    query: web::Query<FeeQuery>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let query = query.into_inner();
    let fee = fees::simulate_fee(&query.brand, query.amount, state.clock.now());
    Ok(HttpResponse::Ok().json(FeeResponse {
        brand: query.brand,
        amount: query.amount,
        fee,
    }))
}
