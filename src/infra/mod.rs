/// External integrations
pub mod postgres;
