use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("Bank error: '{0}' is not a supported bank (expected one of Citi, UOB, DBS)")]
    Unsupported(String),
    #[error("Bank error: Value is an empty string")]
    Empty
}
