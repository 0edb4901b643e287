/// Domain model and business rules
pub mod card;
pub mod clock;
pub mod expiry;
pub mod fees;
pub mod transaction;
pub mod validation;

pub use card::{CardBrand, CreditCard};
pub use clock::{Clock, SystemClock};
pub use expiry::Expiry;
pub use transaction::Transaction;
