use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Expiry;

/// Card network. Closed set; the brand selects the fee formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardBrand {
    Visa,
    Nara,
    Amex,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown card brand: {0}")]
pub struct UnknownBrand(pub String);

impl CardBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "VISA",
            CardBrand::Nara => "NARA",
            CardBrand::Amex => "AMEX",
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardBrand {
    type Err = UnknownBrand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VISA" => Ok(CardBrand::Visa),
            "NARA" => Ok(CardBrand::Nara),
            "AMEX" => Ok(CardBrand::Amex),
            _ => Err(UnknownBrand(s.to_string())),
        }
    }
}

/// A credit-card record. The id is assigned by the store and absent before
/// persistence. Update operations overwrite all four business fields while
/// keeping the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub card_number: String,
    pub holder_name: String,
    pub expiration_date: Expiry,
    pub brand: CardBrand,
}

impl CreditCard {
    /// Canonical card-number form: ASCII space grouping as seen in API
    /// payloads ("1234 5678 9012 3456") collapses to the contiguous string
    /// the 16-digit rule is enforced on.
    pub fn normalized_number(number: &str) -> String {
        number.chars().filter(|c| *c != ' ').collect()
    }

    pub fn normalize_number(&mut self) {
        self.card_number = Self::normalized_number(&self.card_number);
    }
}
