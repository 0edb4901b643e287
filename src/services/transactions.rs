use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::fees;
use crate::domain::validation::validate_admission;
use crate::domain::{Clock, CreditCard, Transaction};
use crate::errors::ServiceError;
use crate::store::{CardStore, NewTransaction, TransactionStore};

/// Transaction CRUD plus admission validation and fee calculation. Every
/// created transaction is stamped from the injected clock.
pub struct TransactionService<S, C> {
    store: S,
    cards: C,
    clock: Arc<dyn Clock>,
}

impl<S: TransactionStore, C: CardStore> TransactionService<S, C> {
    pub fn new(store: S, cards: C, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            cards,
            clock,
        }
    }

    pub async fn create(
        &self,
        credit_card_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, ServiceError> {
        let Some(credit_card) = self.cards.find_by_id(credit_card_id).await? else {
            return Err(ServiceError::CreditCardNotFound);
        };
        validate_admission(Some(&credit_card), amount)?;

        let date_time = self.clock.now();
        let id = self
            .store
            .insert(&NewTransaction {
                credit_card_id,
                amount,
                date_time,
            })
            .await?;
        tracing::info!(transaction_id = id, credit_card_id, "transaction created");

        Ok(Transaction {
            id: Some(id),
            credit_card,
            amount,
            date_time,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Transaction, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::TransactionNotFound)
    }

    pub async fn list(&self) -> Result<Vec<Transaction>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    /// Replaces card, amount and timestamp; a missing timestamp means "now".
    pub async fn update(
        &self,
        id: i64,
        credit_card_id: i64,
        amount: Decimal,
        date_time: Option<DateTime<Utc>>,
    ) -> Result<Transaction, ServiceError> {
        if !self.store.exists_by_id(id).await? {
            return Err(ServiceError::TransactionNotFound);
        }
        let Some(credit_card) = self.cards.find_by_id(credit_card_id).await? else {
            return Err(ServiceError::CreditCardNotFound);
        };

        let date_time = date_time.unwrap_or_else(|| self.clock.now());
        self.store
            .update(
                id,
                &NewTransaction {
                    credit_card_id,
                    amount,
                    date_time,
                },
            )
            .await?;

        Ok(Transaction {
            id: Some(id),
            credit_card,
            amount,
            date_time,
        })
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.exists_by_id(id).await? {
            return Err(ServiceError::TransactionNotFound);
        }
        Ok(self.store.delete_by_id(id).await?)
    }

    /// Admission check with the card supplied by value; never touches the
    /// store.
    pub fn validate(
        &self,
        credit_card: Option<&CreditCard>,
        amount: Decimal,
    ) -> Result<(), ServiceError> {
        validate_admission(credit_card, amount)
    }

    pub fn fee(&self, transaction: &Transaction) -> Decimal {
        fees::calculate_fee(transaction)
    }

    pub fn simulate_fee(&self, brand: &str, amount: Decimal) -> Decimal {
        fees::simulate_fee(brand, amount, self.clock.now())
    }
}
