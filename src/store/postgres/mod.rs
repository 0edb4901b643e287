/// Postgres-backed stores
pub mod cards;
pub mod transactions;

pub use cards::CardRepository;
pub use transactions::TransactionRepository;
