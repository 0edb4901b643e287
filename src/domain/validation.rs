/// Card validation and transaction admission rules.
///
/// The two validators intentionally behave differently: card validation
/// collects every violation before failing once, admission stops at the
/// first failure. Callers depend on the resulting error shapes.
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{CreditCard, Expiry};
use crate::errors::ServiceError;

/// Admission ceiling, inclusive.
pub const MAX_TRANSACTION_AMOUNT: Decimal = dec!(1000);

fn card_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{16}$").expect("card number pattern is valid"))
}

/// Checks every card rule against `now` (month granularity) and reports all
/// violations at once as `CardNotValid`.
pub fn validate_card(card: &CreditCard, now: Expiry) -> Result<(), ServiceError> {
    let mut violations = Vec::new();

    if !card_number_pattern().is_match(&card.card_number) {
        violations.push("card number must be exactly 16 digits".to_string());
    }
    if card.expiration_date < now {
        violations.push("card expiration date is in the past".to_string());
    }
    if !holder_name_is_valid(&card.holder_name) {
        violations.push("holder name must be at least two alphabetic words".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::CardNotValid { violations })
    }
}

// At least two whitespace-separated tokens, each purely ASCII letters.
// Digits, punctuation and diacritics are rejected.
fn holder_name_is_valid(name: &str) -> bool {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    tokens.len() >= 2
        && tokens
            .iter()
            .all(|token| token.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Month-granular expiration check; a card expiring this month is valid.
pub fn expiration_is_valid(card: &CreditCard, now: Expiry) -> bool {
    card.expiration_date >= now
}

/// Decides whether a transaction may be created against `card` for
/// `amount`. Short-circuits on the first failure.
pub fn validate_admission(card: Option<&CreditCard>, amount: Decimal) -> Result<(), ServiceError> {
    if card.is_none() {
        return Err(ServiceError::CreditCardNotFound);
    }
    if amount <= Decimal::ZERO || amount > MAX_TRANSACTION_AMOUNT {
        return Err(ServiceError::TransactionAmountInvalid);
    }
    Ok(())
}
