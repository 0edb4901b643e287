/// Orchestration services composing the business rules with the store
pub mod cards;
pub mod transactions;

pub use cards::CreditCardService;
pub use transactions::TransactionService;
