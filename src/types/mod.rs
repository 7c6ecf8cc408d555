mod bank;
mod errors;

pub use bank::BankIdentifier;
pub use errors::BankError;

/// Monotonic tag attached to every dashboard fetch the store starts.
pub type RequestSequence = u64;
