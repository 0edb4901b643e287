use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CreditCard;

/// A charge against a credit card. Many transactions share one card; the
/// card is read-only from the transaction's side. The fee is derived on
/// demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub credit_card: CreditCard,
    pub amount: Decimal,
    pub date_time: DateTime<Utc>,
}
