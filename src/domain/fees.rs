/// Brand-specific fee calculation.
///
/// All arithmetic stays in `Decimal`; the half-up rounding on the VISA
/// division happens before the rate is used and must not be reordered.
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::{CardBrand, CreditCard, Expiry, Transaction};

// Rate as a percentage of the amount, derived from the transaction
// timestamp. With yy = year % 100, mm = month (1-12), dd = day of month:
// VISA yy/mm rounded half-up to 2 decimals, NARA dd * 0.5, AMEX mm * 0.1.
fn rate(brand: CardBrand, date_time: &DateTime<Utc>) -> Decimal {
    let yy = Decimal::from(date_time.year() % 100);
    let mm = Decimal::from(date_time.month());
    let dd = Decimal::from(date_time.day());
    match brand {
        CardBrand::Visa => {
            (yy / mm).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
        CardBrand::Nara => dd * dec!(0.5),
        CardBrand::Amex => mm * dec!(0.1),
    }
}

/// Fee owed for a transaction: `amount * rate / 100`. Deterministic in
/// (amount, brand, date_time); no side effects.
pub fn calculate_fee(transaction: &Transaction) -> Decimal {
    let rate = rate(transaction.credit_card.brand, &transaction.date_time);
    transaction.amount * rate / dec!(100)
}

/// Quotes the fee a transaction of `amount` would pay at `now` on a card of
/// the given brand. Builds throwaway card and transaction values purely to
/// run the formula; nothing is looked up or persisted. An unrecognized
/// brand quotes a zero fee.
pub fn simulate_fee(brand: &str, amount: Decimal, now: DateTime<Utc>) -> Decimal {
    let Ok(brand) = brand.parse::<CardBrand>() else {
        return Decimal::ZERO;
    };
    let credit_card = CreditCard {
        id: None,
        card_number: "1234567890123456".to_string(),
        holder_name: "John Doe".to_string(),
        expiration_date: Expiry::from_datetime(&now).plus_years(1),
        brand,
    };
    let transaction = Transaction {
        id: None,
        credit_card,
        amount,
        date_time: now,
    };
    calculate_fee(&transaction)
}
