use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{CardBrand, CreditCard, Expiry, Transaction};
use crate::store::{NewTransaction, TransactionStore};

// Transaction joined with its card; the card outlives the transaction and
// is hydrated on every read.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    amount: Decimal,
    date_time: DateTime<Utc>,
    credit_card_id: i64,
    card_number: String,
    holder_name: String,
    expiration_date: String,
    brand: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = sqlx::Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let expiration_date = row
            .expiration_date
            .parse::<Expiry>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let brand = row
            .brand
            .parse::<CardBrand>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Transaction {
            id: Some(row.id),
            credit_card: CreditCard {
                id: Some(row.credit_card_id),
                card_number: row.card_number,
                holder_name: row.holder_name,
                expiration_date,
                brand,
            },
            amount: row.amount,
            date_time: row.date_time,
        })
    }
}

const SELECT_JOINED: &str = r#"
    SELECT t.id, t.amount, t.date_time,
           c.id AS credit_card_id, c.card_number, c.holder_name, c.expiration_date, c.brand
    FROM transactions t
    JOIN credit_cards c ON c.id = t.credit_card_id
"#;

pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>, sqlx::Error> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_JOINED} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_JOINED} ORDER BY t.id"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn insert(&self, tx: &NewTransaction) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transactions (credit_card_id, amount, date_time)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(tx.credit_card_id)
        .bind(tx.amount)
        .bind(tx.date_time)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: i64, tx: &NewTransaction) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET credit_card_id = $1, amount = $2, date_time = $3
            WHERE id = $4
            "#,
        )
        .bind(tx.credit_card_id)
        .bind(tx.amount)
        .bind(tx.date_time)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM transactions WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }
}
