use std::sync::Arc;

use crate::domain::validation::{expiration_is_valid, validate_card};
use crate::domain::{CardBrand, Clock, CreditCard, Expiry};
use crate::errors::ServiceError;
use crate::store::CardStore;

/// Card CRUD plus the card-level business rules: full aggregate validation
/// on create and update, and exact-tuple duplicate detection.
pub struct CreditCardService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: CardStore> CreditCardService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn current_month(&self) -> Expiry {
        Expiry::from_datetime(&self.clock.now())
    }

    pub async fn create(&self, mut card: CreditCard) -> Result<CreditCard, ServiceError> {
        card.normalize_number();
        validate_card(&card, self.current_month())?;
        let created = self.store.insert(&card).await?;
        tracing::info!(card_id = ?created.id, "credit card created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<CreditCard, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::CreditCardNotFound)
    }

    pub async fn list(&self) -> Result<Vec<CreditCard>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    /// Replaces all four business fields, keeping the identity.
    pub async fn update(&self, id: i64, mut card: CreditCard) -> Result<CreditCard, ServiceError> {
        if !self.store.exists_by_id(id).await? {
            return Err(ServiceError::CreditCardNotFound);
        }
        card.normalize_number();
        validate_card(&card, self.current_month())?;
        Ok(self.store.update(id, &card).await?)
    }

    // Deletes unconditionally; only transaction deletion reports a miss.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.store.delete_by_id(id).await?)
    }

    /// Every rule the card currently violates; empty means valid.
    pub fn violations(&self, card: &CreditCard) -> Vec<String> {
        match validate_card(card, self.current_month()) {
            Ok(()) => Vec::new(),
            Err(ServiceError::CardNotValid { violations }) => violations,
            Err(_) => Vec::new(),
        }
    }

    pub fn is_expiration_valid(&self, card: &CreditCard) -> bool {
        expiration_is_valid(card, self.current_month())
    }

    /// True when no stored card matches the exact
    /// (number, holder, expiration, brand) tuple.
    pub async fn is_distinct(&self, card: &CreditCard) -> Result<bool, ServiceError> {
        let number = CreditCard::normalized_number(&card.card_number);
        let existing = self
            .store
            .find_exact(&number, &card.holder_name, card.expiration_date, card.brand)
            .await?;
        Ok(existing.is_none())
    }

    pub async fn find_exact(
        &self,
        card_number: &str,
        holder_name: &str,
        expiration_date: Expiry,
        brand: CardBrand,
    ) -> Result<Option<CreditCard>, ServiceError> {
        Ok(self
            .store
            .find_exact(card_number, holder_name, expiration_date, brand)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::store::MockCardStore;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2022, 12, 10, 12, 0, 0).unwrap(),
        ))
    }

    fn valid_card() -> CreditCard {
        CreditCard {
            id: None,
            card_number: "1234567890123456".to_string(),
            holder_name: "John Doe".to_string(),
            expiration_date: Expiry::new(2025, 12).unwrap(),
            brand: CardBrand::Visa,
        }
    }

    fn with_id(mut card: CreditCard, id: i64) -> CreditCard {
        card.id = Some(id);
        card
    }

    #[actix_rt::test]
    async fn create_persists_a_valid_card() {
        let mut store = MockCardStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|card| Ok(with_id(card.clone(), 1)));

        let service = CreditCardService::new(store, fixed_clock());
        let created = service.create(valid_card()).await.unwrap();
        assert_eq!(created.id, Some(1));
    }

    #[actix_rt::test]
    async fn create_normalizes_space_grouped_numbers() {
        let mut store = MockCardStore::new();
        store
            .expect_insert()
            .withf(|card| card.card_number == "1234567890123456")
            .times(1)
            .returning(|card| Ok(with_id(card.clone(), 1)));

        let service = CreditCardService::new(store, fixed_clock());
        let mut card = valid_card();
        card.card_number = "1234 5678 9012 3456".to_string();
        service.create(card).await.unwrap();
    }

    #[actix_rt::test]
    async fn create_reports_every_violation_and_never_saves() {
        // No insert expectation: the mock panics if the store is touched.
        let store = MockCardStore::new();
        let service = CreditCardService::new(store, fixed_clock());

        let card = CreditCard {
            id: None,
            card_number: "12".to_string(),
            holder_name: "John".to_string(),
            expiration_date: Expiry::new(2020, 1).unwrap(),
            brand: CardBrand::Visa,
        };
        match service.create(card).await.unwrap_err() {
            ServiceError::CardNotValid { violations } => assert_eq!(violations.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_rt::test]
    async fn create_accepts_expiry_equal_to_current_month() {
        let mut store = MockCardStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|card| Ok(with_id(card.clone(), 1)));

        let service = CreditCardService::new(store, fixed_clock());
        let mut card = valid_card();
        card.expiration_date = Expiry::new(2022, 12).unwrap();
        assert!(service.create(card).await.is_ok());
    }

    #[actix_rt::test]
    async fn get_missing_card_is_not_found() {
        let mut store = MockCardStore::new();
        store
            .expect_find_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let service = CreditCardService::new(store, fixed_clock());
        assert!(matches!(
            service.get(42).await.unwrap_err(),
            ServiceError::CreditCardNotFound
        ));
    }

    #[actix_rt::test]
    async fn update_replaces_all_business_fields() {
        let mut store = MockCardStore::new();
        store.expect_exists_by_id().with(eq(1)).returning(|_| Ok(true));
        store
            .expect_update()
            .withf(|id, card| {
                *id == 1
                    && card.card_number == "2345678901234567"
                    && card.holder_name == "Jane Doe"
                    && card.brand == CardBrand::Nara
            })
            .times(1)
            .returning(|id, card| Ok(with_id(card.clone(), id)));

        let service = CreditCardService::new(store, fixed_clock());
        let replacement = CreditCard {
            id: None,
            card_number: "2345678901234567".to_string(),
            holder_name: "Jane Doe".to_string(),
            expiration_date: Expiry::new(2024, 3).unwrap(),
            brand: CardBrand::Nara,
        };
        let updated = service.update(1, replacement).await.unwrap();
        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.holder_name, "Jane Doe");
    }

    #[actix_rt::test]
    async fn update_missing_card_is_not_found() {
        let mut store = MockCardStore::new();
        store.expect_exists_by_id().returning(|_| Ok(false));

        let service = CreditCardService::new(store, fixed_clock());
        assert!(matches!(
            service.update(9, valid_card()).await.unwrap_err(),
            ServiceError::CreditCardNotFound
        ));
    }

    #[actix_rt::test]
    async fn is_distinct_flips_on_an_exact_tuple_match() {
        let card = valid_card();

        let mut store = MockCardStore::new();
        let stored = with_id(card.clone(), 1);
        store
            .expect_find_exact()
            .returning(move |_, _, _, _| Ok(Some(stored.clone())));
        let service = CreditCardService::new(store, fixed_clock());
        assert!(!service.is_distinct(&card).await.unwrap());

        let mut store = MockCardStore::new();
        store
            .expect_find_exact()
            .returning(|_, _, _, _| Ok(None));
        let service = CreditCardService::new(store, fixed_clock());
        assert!(service.is_distinct(&card).await.unwrap());
    }

    /// Store fake holding one card, with `find_exact` doing the real
    /// tuple comparison the SQL `WHERE` clause performs.
    struct SingleCardStore {
        stored: CreditCard,
    }

    #[async_trait::async_trait]
    impl CardStore for SingleCardStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<CreditCard>, sqlx::Error> {
            Ok((self.stored.id == Some(id)).then(|| self.stored.clone()))
        }

        async fn find_all(&self) -> Result<Vec<CreditCard>, sqlx::Error> {
            Ok(vec![self.stored.clone()])
        }

        async fn insert(&self, card: &CreditCard) -> Result<CreditCard, sqlx::Error> {
            Ok(with_id(card.clone(), 2))
        }

        async fn update(&self, id: i64, card: &CreditCard) -> Result<CreditCard, sqlx::Error> {
            Ok(with_id(card.clone(), id))
        }

        async fn delete_by_id(&self, _id: i64) -> Result<(), sqlx::Error> {
            Ok(())
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
            Ok(self.stored.id == Some(id))
        }

        async fn find_exact(
            &self,
            card_number: &str,
            holder_name: &str,
            expiration_date: Expiry,
            brand: CardBrand,
        ) -> Result<Option<CreditCard>, sqlx::Error> {
            let hit = self.stored.card_number == card_number
                && self.stored.holder_name == holder_name
                && self.stored.expiration_date == expiration_date
                && self.stored.brand == brand;
            Ok(hit.then(|| self.stored.clone()))
        }
    }

    #[actix_rt::test]
    async fn changing_any_single_field_makes_a_card_distinct() {
        let service = CreditCardService::new(
            SingleCardStore {
                stored: with_id(valid_card(), 1),
            },
            fixed_clock(),
        );

        let base = valid_card();
        assert!(!service.is_distinct(&base).await.unwrap());

        let mut card = base.clone();
        card.card_number = "6543210987654321".to_string();
        assert!(service.is_distinct(&card).await.unwrap());

        let mut card = base.clone();
        card.holder_name = "Jane Doe".to_string();
        assert!(service.is_distinct(&card).await.unwrap());

        // Exact means exact: a casing change is a different holder.
        let mut card = base.clone();
        card.holder_name = "JOHN DOE".to_string();
        assert!(service.is_distinct(&card).await.unwrap());

        let mut card = base.clone();
        card.expiration_date = Expiry::new(2026, 1).unwrap();
        assert!(service.is_distinct(&card).await.unwrap());

        let mut card = base.clone();
        card.brand = CardBrand::Amex;
        assert!(service.is_distinct(&card).await.unwrap());
    }

    #[actix_rt::test]
    async fn is_distinct_queries_with_the_normalized_number() {
        let mut store = MockCardStore::new();
        store
            .expect_find_exact()
            .withf(|number, _, _, _| number == "1234567890123456")
            .returning(|_, _, _, _| Ok(None));

        let service = CreditCardService::new(store, fixed_clock());
        let mut card = valid_card();
        card.card_number = "1234 5678 9012 3456".to_string();
        assert!(service.is_distinct(&card).await.unwrap());
    }

    #[actix_rt::test]
    async fn expiration_view_matches_the_month_rule() {
        let store = MockCardStore::new();
        let service = CreditCardService::new(store, fixed_clock());

        let mut card = valid_card();
        assert!(service.is_expiration_valid(&card));
        card.expiration_date = Expiry::new(2022, 12).unwrap();
        assert!(service.is_expiration_valid(&card));
        card.expiration_date = Expiry::new(2022, 11).unwrap();
        assert!(!service.is_expiration_valid(&card));
    }
}
