use crate::types::errors::BankError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The banks whose statements the conversion endpoint understands.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BankIdentifier {
    Citi,
    Uob,
    Dbs
}

impl BankIdentifier {
    pub const ALL: [BankIdentifier; 3] = [BankIdentifier::Citi, BankIdentifier::Uob, BankIdentifier::Dbs];

    /// The spelling the conversion endpoint expects in the `bank` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            BankIdentifier::Citi => "Citi",
            BankIdentifier::Uob => "UOB",
            BankIdentifier::Dbs => "DBS"
        }
    }
}

impl Display for BankIdentifier {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for BankIdentifier {
    type Err = BankError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(BankError::Empty);
        }

        BankIdentifier::ALL.into_iter()
            .find(|bank| bank.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| BankError::Unsupported(value.to_string()))
    }
}
