use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{CardBrand, CreditCard, Expiry};
use crate::store::CardStore;

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: i64,
    card_number: String,
    holder_name: String,
    expiration_date: String,
    brand: String,
}

impl TryFrom<CardRow> for CreditCard {
    type Error = sqlx::Error;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let expiration_date = row
            .expiration_date
            .parse::<Expiry>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let brand = row
            .brand
            .parse::<CardBrand>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(CreditCard {
            id: Some(row.id),
            card_number: row.card_number,
            holder_name: row.holder_name,
            expiration_date,
            brand,
        })
    }
}

pub struct CardRepository {
    pool: PgPool,
}

impl CardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardStore for CardRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CreditCard>, sqlx::Error> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, card_number, holder_name, expiration_date, brand
            FROM credit_cards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CreditCard::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<CreditCard>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, card_number, holder_name, expiration_date, brand
            FROM credit_cards
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CreditCard::try_from).collect()
    }

    async fn insert(&self, card: &CreditCard) -> Result<CreditCard, sqlx::Error> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            INSERT INTO credit_cards (card_number, holder_name, expiration_date, brand)
            VALUES ($1, $2, $3, $4)
            RETURNING id, card_number, holder_name, expiration_date, brand
            "#,
        )
        .bind(&card.card_number)
        .bind(&card.holder_name)
        .bind(card.expiration_date.to_string())
        .bind(card.brand.as_str())
        .fetch_one(&self.pool)
        .await?;

        CreditCard::try_from(row)
    }

    async fn update(&self, id: i64, card: &CreditCard) -> Result<CreditCard, sqlx::Error> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            UPDATE credit_cards
            SET card_number = $1, holder_name = $2, expiration_date = $3, brand = $4
            WHERE id = $5
            RETURNING id, card_number, holder_name, expiration_date, brand
            "#,
        )
        .bind(&card.card_number)
        .bind(&card.holder_name)
        .bind(card.expiration_date.to_string())
        .bind(card.brand.as_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        CreditCard::try_from(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM credit_cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM credit_cards WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    async fn find_exact(
        &self,
        card_number: &str,
        holder_name: &str,
        expiration_date: Expiry,
        brand: CardBrand,
    ) -> Result<Option<CreditCard>, sqlx::Error> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, card_number, holder_name, expiration_date, brand
            FROM credit_cards
            WHERE card_number = $1
              AND holder_name = $2
              AND expiration_date = $3
              AND brand = $4
            "#,
        )
        .bind(card_number)
        .bind(holder_name)
        .bind(expiration_date.to_string())
        .bind(brand.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CreditCard::try_from).transpose()
    }
}
