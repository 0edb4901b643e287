/// Store contract
///
/// The business layer reaches persistence only through these traits; the
/// Postgres implementations live in `postgres`. No mutual exclusion is
/// provided here — racing duplicate checks are a store-level concern
/// (uniqueness constraint), not something this layer enforces.
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;

use crate::domain::{CardBrand, CreditCard, Expiry, Transaction};

/// Transaction fields before the store has assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub credit_card_id: i64,
    pub amount: Decimal,
    pub date_time: DateTime<Utc>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<CreditCard>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<CreditCard>, sqlx::Error>;
    /// Insert-or-assign: ignores any id on `card`, returns the stored row.
    async fn insert(&self, card: &CreditCard) -> Result<CreditCard, sqlx::Error>;
    async fn update(&self, id: i64, card: &CreditCard) -> Result<CreditCard, sqlx::Error>;
    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;
    /// Exact-match lookup on the full (number, holder, expiration, brand)
    /// tuple; nothing fuzzy about it.
    async fn find_exact(
        &self,
        card_number: &str,
        holder_name: &str,
        expiration_date: Expiry,
        brand: CardBrand,
    ) -> Result<Option<CreditCard>, sqlx::Error>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Transaction>, sqlx::Error>;
    /// Returns the id assigned to the new row.
    async fn insert(&self, tx: &NewTransaction) -> Result<i64, sqlx::Error>;
    async fn update(&self, id: i64, tx: &NewTransaction) -> Result<(), sqlx::Error>;
    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;
}
